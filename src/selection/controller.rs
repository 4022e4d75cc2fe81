use std::sync::Arc;

use log::{debug, info};
use solana_sdk::pubkey::Pubkey;

use super::{parse_stake_amount, SelectionChange, SelectionSet, ValidationError};
use crate::{
    actions::{ActionHandlers, ClaimRewardsRequest, StakeRequest, UnstakeRequest},
    notify::{Notification, Notifier},
    pool::{ReceiptType, Snapshot, StakePoolMetadata, TokenStandard},
    tokens::{StakeEntry, StakedTokenRecord, TokenKind, UnstakedTokenRecord},
    totals::{compute_total_staked, decimals::MintDecimals, TotalStakedTracker},
};

fn mint_key(token: &UnstakedTokenRecord) -> String {
    token.mint_key()
}

fn original_mint_key(token: &StakedTokenRecord) -> String {
    token.original_mint_key()
}

fn entry_key(token: &StakedTokenRecord) -> String {
    token.entry_key()
}

/// Page state between the raw token lists and the stake / unstake / claim
/// handlers.
pub struct StakePoolController {
    wallet: Option<Pubkey>,
    unstaked: SelectionSet<UnstakedTokenRecord>,
    staked: SelectionSet<StakedTokenRecord>,
    single_token_action: Option<Pubkey>,
    receipt_type: ReceiptType,
    show_allowed_tokens: bool,
    show_fungible_tokens: bool,
    total_staked: TotalStakedTracker,
    entries_fetched: bool,
    metadata: Option<StakePoolMetadata>,
    /// Name of the metadata last synced; outer `None` until the first sync.
    synced_metadata_name: Option<Option<String>>,
    handlers: ActionHandlers,
    notifier: Arc<dyn Notifier>,
}

impl StakePoolController {
    pub fn new(wallet: Option<Pubkey>, handlers: ActionHandlers, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            wallet,
            unstaked: SelectionSet::new(),
            staked: SelectionSet::new(),
            single_token_action: None,
            receipt_type: ReceiptType::Original,
            show_allowed_tokens: false,
            show_fungible_tokens: false,
            total_staked: TotalStakedTracker::default(),
            entries_fetched: false,
            metadata: None,
            synced_metadata_name: None,
            handlers,
            notifier,
        }
    }

    pub fn wallet(&self) -> Option<&Pubkey> {
        self.wallet.as_ref()
    }

    pub fn set_wallet(&mut self, wallet: Option<Pubkey>) {
        self.wallet = wallet;
    }

    pub fn unstaked_selection(&self) -> &[UnstakedTokenRecord] {
        self.unstaked.as_slice()
    }

    pub fn staked_selection(&self) -> &[StakedTokenRecord] {
        self.staked.as_slice()
    }

    fn frozen(&self) -> bool {
        self.handlers.stake_or_unstake_in_flight()
    }

    fn reject(&self, error: ValidationError) -> ValidationError {
        self.notifier.notify(Notification::error(error.to_string()));
        error
    }

    /* ------------------------------ selection ------------------------ */

    /// Click or amount entry on a wallet token.
    ///
    /// Fungible tokens are selected by typing an amount and deselected by a
    /// click without text. Unique tokens toggle on every click.
    pub fn select_unstaked_token(
        &mut self,
        token: &UnstakedTokenRecord,
        raw_input: Option<&str>,
    ) -> Result<SelectionChange, ValidationError> {
        if self.frozen() {
            debug!("⏸️ [SELECTION] Ignoring {} while an action is in flight", token.mint);
            return Ok(SelectionChange::Ignored);
        }

        match token.kind {
            TokenKind::Fungible { .. } => match raw_input.filter(|text| !text.is_empty()) {
                Some(text) => {
                    parse_stake_amount(text).map_err(|e| self.reject(e))?;
                    let mut selected = token.clone();
                    selected.amount_to_stake = Some(text.to_string());
                    self.unstaked.upsert_by(selected, mint_key);
                    Ok(SelectionChange::Selected)
                }
                None => {
                    if self.unstaked.remove_by(&token.mint_key(), mint_key) {
                        Ok(SelectionChange::Deselected)
                    } else {
                        Ok(SelectionChange::Unchanged)
                    }
                }
            },
            TokenKind::Unique => {
                if self.unstaked.remove_by(&token.mint_key(), mint_key) {
                    Ok(SelectionChange::Deselected)
                } else {
                    self.unstaked.insert_by(token.clone(), mint_key);
                    Ok(SelectionChange::Selected)
                }
            }
        }
    }

    /// Click on a staked token. Only the wallet that staked it may select it.
    ///
    /// Membership is checked by original mint but removal goes by stake entry,
    /// so deselecting one of several entries sharing a mint leaves the others.
    pub fn select_staked_token(&mut self, token: &StakedTokenRecord) -> SelectionChange {
        if self.frozen() {
            debug!("⏸️ [SELECTION] Ignoring {} while an action is in flight", token.entry.pubkey);
            return SelectionChange::Ignored;
        }
        if !self.is_owned_by_wallet(token) {
            return SelectionChange::Ignored;
        }

        if self.is_staked_token_selected(token) {
            if self.staked.remove_by(&token.entry_key(), entry_key) {
                SelectionChange::Deselected
            } else {
                SelectionChange::Unchanged
            }
        } else {
            self.staked.insert_by(token.clone(), entry_key);
            SelectionChange::Selected
        }
    }

    pub fn is_unstaked_token_selected(&self, token: &UnstakedTokenRecord) -> bool {
        self.unstaked.contains_by(&token.mint_key(), mint_key)
    }

    pub fn is_staked_token_selected(&self, token: &StakedTokenRecord) -> bool {
        self.staked.contains_by(&token.original_mint_key(), original_mint_key)
    }

    /// Select every listed candidate, dropping the previous selection.
    pub fn select_all_unstaked(&mut self, tokens: &[UnstakedTokenRecord]) -> SelectionChange {
        if self.frozen() {
            return SelectionChange::Ignored;
        }
        self.unstaked.replace_all(tokens.iter().cloned(), mint_key);
        info!("☑️ [SELECTION] Selected all {} unstaked tokens", self.unstaked.len());
        SelectionChange::Selected
    }

    /// Select every listed staked token, dropping the previous selection.
    pub fn select_all_staked(&mut self, tokens: &[StakedTokenRecord]) -> SelectionChange {
        if self.frozen() {
            return SelectionChange::Ignored;
        }
        self.staked.replace_all(tokens.iter().cloned(), entry_key);
        info!("☑️ [SELECTION] Selected all {} staked tokens", self.staked.len());
        SelectionChange::Selected
    }

    /* ------------------------------ intents -------------------------- */

    pub fn stake(&self) -> Result<(), ValidationError> {
        if self.unstaked.is_empty() {
            return Err(self.reject(ValidationError::NoTokensSelected));
        }
        info!(
            "📥 [SELECTION] Staking {} token(s) as {}",
            self.unstaked.len(),
            self.receipt_type
        );
        self.handlers.stake.mutate(StakeRequest {
            tokens: self.unstaked.to_vec(),
            receipt_type: self.receipt_type,
        });
        Ok(())
    }

    pub fn unstake(&self) -> Result<(), ValidationError> {
        if self.staked.is_empty() {
            return Err(self.reject(ValidationError::NoTokensSelected));
        }
        info!("📤 [SELECTION] Unstaking {} token(s)", self.staked.len());
        self.handlers.unstake.mutate(UnstakeRequest {
            tokens: self.staked.to_vec(),
        });
        Ok(())
    }

    /// Whether the claim button is offered at all is decided by
    /// [`rewards_claimable`](crate::pool::stats::rewards_claimable).
    pub fn claim_rewards(&self) -> Result<(), ValidationError> {
        if self.staked.is_empty() {
            return Err(self.reject(ValidationError::NoTokensSelected));
        }
        info!("🎁 [SELECTION] Claiming rewards for {} token(s)", self.staked.len());
        self.handlers.claim_rewards.mutate(ClaimRewardsRequest {
            tokens: self.staked.to_vec(),
        });
        Ok(())
    }

    /* ------------------------------ busy markers --------------------- */

    /// Mint a single-token quick action is working on.
    pub fn set_single_token_action(&mut self, mint: Pubkey) {
        self.single_token_action = Some(mint);
    }

    pub fn clear_single_token_action(&mut self) {
        self.single_token_action = None;
    }

    pub fn single_token_action(&self) -> Option<&Pubkey> {
        self.single_token_action.as_ref()
    }

    pub fn is_unstaked_token_busy(&self, token: &UnstakedTokenRecord) -> bool {
        self.handlers.stake.is_loading()
            && (self.is_unstaked_token_selected(token) || self.single_token_action == Some(token.mint))
    }

    pub fn staked_token_busy_label(&self, token: &StakedTokenRecord) -> Option<&'static str> {
        let unstaking = self.handlers.unstake.is_loading();
        if !unstaking && !self.handlers.claim_rewards.is_loading() {
            return None;
        }
        let marked = self.single_token_action == Some(token.entry.original_mint);
        if !self.is_staked_token_selected(token) && !marked {
            return None;
        }
        Some(if unstaking {
            "Unstaking token..."
        } else {
            "Claiming rewards..."
        })
    }

    /// False when no wallet is connected.
    pub fn is_owned_by_wallet(&self, token: &StakedTokenRecord) -> bool {
        self.wallet.as_ref() == Some(token.last_staker())
    }

    /* ------------------------------ display toggles ------------------ */

    pub fn receipt_type(&self) -> ReceiptType {
        self.receipt_type
    }

    pub fn toggle_receipt_type(&mut self) -> ReceiptType {
        self.receipt_type = self.receipt_type.toggled();
        self.receipt_type
    }

    pub fn receipt_type_toggle_visible(&self) -> bool {
        self.metadata.as_ref().map_or(true, |m| m.receipt_type.is_none())
    }

    pub fn show_fungible_tokens(&self) -> bool {
        self.show_fungible_tokens
    }

    pub fn toggle_fungible_tokens(&mut self) -> bool {
        self.show_fungible_tokens = !self.show_fungible_tokens;
        self.show_fungible_tokens
    }

    pub fn fungible_toggle_visible(&self) -> bool {
        self.metadata.as_ref().map_or(true, |m| m.token_standard.is_none())
    }

    /// Token standard the candidate list is filtered by.
    pub fn token_standard(&self) -> TokenStandard {
        TokenStandard::from_fungible_flag(self.show_fungible_tokens)
    }

    pub fn show_allowed_tokens(&self) -> bool {
        self.show_allowed_tokens
    }

    pub fn toggle_allowed_tokens(&mut self) -> bool {
        self.show_allowed_tokens = !self.show_allowed_tokens;
        self.show_allowed_tokens
    }

    pub fn allowed_tokens_visible(&self) -> bool {
        self.metadata.as_ref().map_or(true, |m| !m.hide_allowed_tokens)
    }

    /// Keeps the latest metadata. When its name differs from the last synced
    /// one, the toggles it fixes are reset to its values. Returns whether a
    /// reset happened.
    pub fn sync_pool_metadata(&mut self, metadata: Option<&StakePoolMetadata>) -> bool {
        self.metadata = metadata.cloned();
        let name = metadata.map(|m| m.name.clone());
        if self.synced_metadata_name.as_ref() == Some(&name) {
            return false;
        }
        self.synced_metadata_name = Some(name);

        if let Some(meta) = metadata {
            if let Some(standard) = meta.token_standard {
                self.show_fungible_tokens = standard == TokenStandard::Fungible;
            }
            if let Some(receipt_type) = meta.receipt_type {
                self.receipt_type = receipt_type;
            }
            debug!(
                "🎛️ [SELECTION] Synced toggles from metadata '{}': fungible={}, receipt={}",
                meta.name, self.show_fungible_tokens, self.receipt_type
            );
        }
        true
    }

    /* ------------------------------ total staked --------------------- */

    pub fn total_staked(&self) -> &str {
        self.total_staked.total()
    }

    /// Records the entries' fetch state. True exactly when it just turned
    /// fetched, i.e. when the total should be recomputed.
    pub fn observe_entries(&mut self, snapshot: &Snapshot<Vec<StakeEntry>>) -> bool {
        let became_fetched = snapshot.is_fetched && !self.entries_fetched;
        self.entries_fetched = snapshot.is_fetched;
        became_fetched
    }

    /// Starts a pass; pair with [`apply_total_staked`](Self::apply_total_staked).
    pub fn begin_total_staked(&mut self) -> u64 {
        self.total_staked.begin()
    }

    /// Stores a pass result unless a newer pass has begun since.
    pub fn apply_total_staked(&mut self, generation: u64, total: String) -> bool {
        self.total_staked.apply(generation, total)
    }

    pub async fn refresh_total_staked<D: MintDecimals + ?Sized>(
        &mut self,
        entries: Option<&[StakeEntry]>,
        source: &D,
    ) -> bool {
        let generation = self.begin_total_staked();
        let total = compute_total_staked(entries, source).await;
        self.apply_total_staked(generation, total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        actions::iface::ActionHandler,
        notify::{testing::RecordingNotifier, NotificationKind},
        tokens::TokenMetadata,
    };
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use num::BigUint;
    use std::sync::{
        atomic::{AtomicBool, Ordering},
        Mutex,
    };

    /// Records requests; its loading flag is set by the test.
    struct FakeHandler<R> {
        loading: AtomicBool,
        calls: Mutex<Vec<R>>,
    }

    impl<R> Default for FakeHandler<R> {
        fn default() -> Self {
            Self {
                loading: AtomicBool::new(false),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl<R> FakeHandler<R> {
        fn set_loading(&self, loading: bool) {
            self.loading.store(loading, Ordering::SeqCst);
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    impl<R: Send> ActionHandler<R> for FakeHandler<R> {
        fn mutate(&self, request: R) {
            self.calls.lock().unwrap().push(request);
        }

        fn is_loading(&self) -> bool {
            self.loading.load(Ordering::SeqCst)
        }
    }

    struct Harness {
        controller: StakePoolController,
        stake: Arc<FakeHandler<StakeRequest>>,
        unstake: Arc<FakeHandler<UnstakeRequest>>,
        claim: Arc<FakeHandler<ClaimRewardsRequest>>,
        notifier: Arc<RecordingNotifier>,
        wallet: Pubkey,
    }

    fn harness() -> Harness {
        let stake = Arc::new(FakeHandler::default());
        let unstake = Arc::new(FakeHandler::default());
        let claim = Arc::new(FakeHandler::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let wallet = Pubkey::new_unique();
        let handlers = ActionHandlers {
            stake: stake.clone(),
            unstake: unstake.clone(),
            claim_rewards: claim.clone(),
        };
        Harness {
            controller: StakePoolController::new(Some(wallet), handlers, notifier.clone()),
            stake,
            unstake,
            claim,
            notifier,
            wallet,
        }
    }

    fn fungible() -> UnstakedTokenRecord {
        UnstakedTokenRecord::new(Pubkey::new_unique(), Pubkey::new_unique(), 1_000_000, 6, None)
    }

    fn unique() -> UnstakedTokenRecord {
        UnstakedTokenRecord::new(
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            1,
            0,
            Some(TokenMetadata {
                name: Some("Ape #1".into()),
                ..Default::default()
            }),
        )
    }

    fn staked(original_mint: Pubkey, last_staker: Pubkey) -> StakedTokenRecord {
        StakedTokenRecord::new(
            StakeEntry {
                pubkey: Pubkey::new_unique(),
                original_mint,
                last_staker,
                amount: BigUint::from(1u32),
            },
            None,
        )
    }

    #[test]
    fn test_fungible_amount_selects_and_keeps_text() {
        let mut h = harness();
        let token = fungible();

        let change = h.controller.select_unstaked_token(&token, Some("1.50")).unwrap();
        assert_eq!(change, SelectionChange::Selected);
        assert!(h.controller.is_unstaked_token_selected(&token));
        assert_eq!(
            h.controller.unstaked_selection()[0].amount_to_stake.as_deref(),
            Some("1.50")
        );

        // entering a new amount replaces, never toggles off
        h.controller.select_unstaked_token(&token, Some("2")).unwrap();
        assert_eq!(h.controller.unstaked_selection().len(), 1);
        assert_eq!(
            h.controller.unstaked_selection()[0].amount_to_stake.as_deref(),
            Some("2")
        );
    }

    #[test]
    fn test_fungible_empty_text_deselects() {
        let mut h = harness();
        let token = fungible();

        h.controller.select_unstaked_token(&token, Some("3")).unwrap();
        assert_eq!(
            h.controller.select_unstaked_token(&token, Some("")).unwrap(),
            SelectionChange::Deselected
        );
        assert!(!h.controller.is_unstaked_token_selected(&token));

        // not present: no-op
        assert_eq!(
            h.controller.select_unstaked_token(&token, None).unwrap(),
            SelectionChange::Unchanged
        );
        assert!(h.controller.unstaked_selection().is_empty());
    }

    #[test]
    fn test_fungible_invalid_text_leaves_selection_and_notifies_once() {
        let mut h = harness();
        let token = fungible();
        h.controller.select_unstaked_token(&token, Some("5")).unwrap();
        let before = h.controller.unstaked_selection().to_vec();

        for bad in ["abc", "0", "inf"] {
            assert_eq!(
                h.controller.select_unstaked_token(&token, Some(bad)),
                Err(ValidationError::InvalidAmount)
            );
            assert_eq!(h.controller.unstaked_selection(), before.as_slice());

            let seen = h.notifier.take();
            assert_eq!(seen.len(), 1);
            assert_eq!(seen[0].kind, NotificationKind::Error);
            assert_eq!(seen[0].message, "Please enter a valid amount");
        }
    }

    #[test]
    fn test_unique_token_toggles() {
        let mut h = harness();
        let other = unique();
        let token = unique();
        h.controller.select_unstaked_token(&other, None).unwrap();
        let before = h.controller.unstaked_selection().to_vec();

        assert_eq!(
            h.controller.select_unstaked_token(&token, None).unwrap(),
            SelectionChange::Selected
        );
        assert_eq!(
            h.controller.select_unstaked_token(&token, None).unwrap(),
            SelectionChange::Deselected
        );
        assert_eq!(h.controller.unstaked_selection(), before.as_slice());
    }

    #[test]
    fn test_selection_frozen_while_stake_or_unstake_in_flight() {
        let mut h = harness();
        let token = unique();
        let mine = staked(Pubkey::new_unique(), h.wallet);

        h.stake.set_loading(true);
        assert_eq!(
            h.controller.select_unstaked_token(&token, None).unwrap(),
            SelectionChange::Ignored
        );
        h.stake.set_loading(false);

        h.unstake.set_loading(true);
        assert_eq!(h.controller.select_staked_token(&mine), SelectionChange::Ignored);
        assert_eq!(
            h.controller.select_all_unstaked(&[token.clone()]),
            SelectionChange::Ignored
        );
        h.unstake.set_loading(false);

        // a running claim does not freeze selection
        h.claim.set_loading(true);
        assert_eq!(h.controller.select_staked_token(&mine), SelectionChange::Selected);
        assert!(h.controller.unstaked_selection().is_empty());
    }

    #[test]
    fn test_foreign_staked_token_is_never_selected() {
        let mut h = harness();
        let foreign = staked(Pubkey::new_unique(), Pubkey::new_unique());

        assert_eq!(h.controller.select_staked_token(&foreign), SelectionChange::Ignored);
        assert!(h.controller.staked_selection().is_empty());

        // select-all may still pick it up; a click still cannot deselect it
        h.controller.select_all_staked(&[foreign.clone()]);
        assert_eq!(h.controller.select_staked_token(&foreign), SelectionChange::Ignored);
        assert_eq!(h.controller.staked_selection().len(), 1);

        h.controller.set_wallet(None);
        assert!(!h.controller.is_owned_by_wallet(&foreign));
    }

    #[test]
    fn test_staked_selection_key_asymmetry() {
        let mut h = harness();
        let shared_mint = Pubkey::new_unique();
        let first = staked(shared_mint, h.wallet);
        let second = staked(shared_mint, h.wallet);

        assert_eq!(h.controller.select_staked_token(&first), SelectionChange::Selected);
        // same original mint reads as selected already
        assert!(h.controller.is_staked_token_selected(&second));

        // clicking the second entry tries to remove it by its own entry key
        assert_eq!(h.controller.select_staked_token(&second), SelectionChange::Unchanged);
        assert_eq!(h.controller.staked_selection(), &[first.clone()]);

        assert_eq!(h.controller.select_staked_token(&first), SelectionChange::Deselected);
        assert!(h.controller.staked_selection().is_empty());
    }

    #[test]
    fn test_select_all_replaces_and_dedupes() {
        let mut h = harness();
        let a = unique();
        let b = fungible();
        h.controller.select_unstaked_token(&unique(), None).unwrap();

        h.controller.select_all_unstaked(&[a.clone(), b.clone(), a.clone()]);
        let keys: Vec<_> = h.controller.unstaked_selection().iter().map(|t| t.mint).collect();
        assert_eq!(keys, vec![a.mint, b.mint]);
    }

    #[test]
    fn test_empty_selection_never_reaches_handlers() {
        let h = harness();

        assert_eq!(h.controller.stake(), Err(ValidationError::NoTokensSelected));
        assert_eq!(h.controller.unstake(), Err(ValidationError::NoTokensSelected));
        assert_eq!(h.controller.claim_rewards(), Err(ValidationError::NoTokensSelected));

        assert_eq!(h.stake.call_count(), 0);
        assert_eq!(h.unstake.call_count(), 0);
        assert_eq!(h.claim.call_count(), 0);

        let seen = h.notifier.take();
        assert_eq!(seen.len(), 3);
        assert!(seen.iter().all(|n| n.message == "No tokens selected"));
    }

    #[test]
    fn test_intents_carry_selection_and_receipt_type() {
        let mut h = harness();
        let token = unique();
        let mine = staked(Pubkey::new_unique(), h.wallet);
        h.controller.select_unstaked_token(&token, None).unwrap();
        h.controller.select_staked_token(&mine);
        h.controller.toggle_receipt_type();

        h.controller.stake().unwrap();
        h.controller.unstake().unwrap();
        h.controller.claim_rewards().unwrap();

        let stakes = h.stake.calls.lock().unwrap();
        assert_eq!(stakes[0].tokens, vec![token]);
        assert_eq!(stakes[0].receipt_type, ReceiptType::Receipt);
        assert_eq!(h.unstake.calls.lock().unwrap()[0].tokens, vec![mine.clone()]);
        assert_eq!(h.claim.calls.lock().unwrap()[0].tokens, vec![mine]);
    }

    #[test]
    fn test_busy_markers() {
        let mut h = harness();
        let token = unique();
        let mine = staked(Pubkey::new_unique(), h.wallet);

        assert!(!h.controller.is_unstaked_token_busy(&token));
        h.stake.set_loading(true);
        assert!(!h.controller.is_unstaked_token_busy(&token));
        h.controller.set_single_token_action(token.mint);
        assert!(h.controller.is_unstaked_token_busy(&token));
        h.controller.clear_single_token_action();
        h.stake.set_loading(false);

        h.controller.select_staked_token(&mine);
        assert_eq!(h.controller.staked_token_busy_label(&mine), None);
        h.claim.set_loading(true);
        assert_eq!(h.controller.staked_token_busy_label(&mine), Some("Claiming rewards..."));
        h.unstake.set_loading(true);
        assert_eq!(h.controller.staked_token_busy_label(&mine), Some("Unstaking token..."));
    }

    #[test]
    fn test_metadata_sync_resets_toggles_on_name_change() {
        let mut h = harness();
        assert_eq!(h.controller.receipt_type(), ReceiptType::Original);
        assert!(!h.controller.show_fungible_tokens());

        let meta = StakePoolMetadata {
            name: "ducks".into(),
            receipt_type: Some(ReceiptType::Receipt),
            token_standard: Some(TokenStandard::Fungible),
            hide_allowed_tokens: true,
            ..Default::default()
        };
        assert!(h.controller.sync_pool_metadata(Some(&meta)));
        assert_eq!(h.controller.receipt_type(), ReceiptType::Receipt);
        assert!(h.controller.show_fungible_tokens());
        assert!(!h.controller.receipt_type_toggle_visible());
        assert!(!h.controller.fungible_toggle_visible());
        assert!(!h.controller.allowed_tokens_visible());

        // local override survives a resync of the same pool
        h.controller.toggle_fungible_tokens();
        assert!(!h.controller.sync_pool_metadata(Some(&meta)));
        assert_eq!(h.controller.token_standard(), TokenStandard::NonFungible);

        let renamed = StakePoolMetadata {
            name: "geese".into(),
            ..meta
        };
        assert!(h.controller.sync_pool_metadata(Some(&renamed)));
        assert!(h.controller.show_fungible_tokens());
    }

    #[test]
    fn test_metadata_without_fixed_values_keeps_toggles() {
        let mut h = harness();
        h.controller.toggle_receipt_type();
        h.controller.toggle_allowed_tokens();

        let meta = StakePoolMetadata {
            name: "plain".into(),
            ..Default::default()
        };
        assert!(h.controller.sync_pool_metadata(Some(&meta)));
        assert_eq!(h.controller.receipt_type(), ReceiptType::Receipt);
        assert!(h.controller.show_allowed_tokens());
        assert!(h.controller.receipt_type_toggle_visible());
    }

    #[test]
    fn test_observe_entries_fires_on_fetch_transition_only() {
        let mut h = harness();
        assert!(!h.controller.observe_entries(&Snapshot::loading()));
        assert!(h.controller.observe_entries(&Snapshot::ready(Vec::new())));
        assert!(!h.controller.observe_entries(&Snapshot::ready(Vec::new()).refetching()));
        assert!(!h.controller.observe_entries(&Snapshot::loading()));
        assert!(h.controller.observe_entries(&Snapshot::fetched(None)));
    }

    struct FixedDecimals(u8);

    #[async_trait]
    impl MintDecimals for FixedDecimals {
        async fn mint_decimals(&self, _mint: &Pubkey) -> Result<u8> {
            Ok(self.0)
        }
    }

    struct NoDecimals;

    #[async_trait]
    impl MintDecimals for NoDecimals {
        async fn mint_decimals(&self, mint: &Pubkey) -> Result<u8> {
            Err(anyhow!("no mint {mint}"))
        }
    }

    #[tokio::test]
    async fn test_refresh_total_staked() {
        let mut h = harness();
        assert_eq!(h.controller.total_staked(), "0");

        let mut big = staked(Pubkey::new_unique(), h.wallet).entry;
        big.amount = BigUint::from(2_500u32);
        let single = staked(Pubkey::new_unique(), h.wallet).entry;
        let entries = vec![big, single];

        assert!(h.controller.refresh_total_staked(Some(entries.as_slice()), &FixedDecimals(3)).await);
        assert_eq!(h.controller.total_staked(), "4");

        // a failing lookup only drops that entry
        assert!(h.controller.refresh_total_staked(Some(entries.as_slice()), &NoDecimals).await);
        assert_eq!(h.controller.total_staked(), "1");

        assert!(h.controller.refresh_total_staked(None, &NoDecimals).await);
        assert_eq!(h.controller.total_staked(), "0");
    }

    #[test]
    fn test_stale_total_is_discarded() {
        let mut h = harness();
        let older = h.controller.begin_total_staked();
        let newer = h.controller.begin_total_staked();
        assert!(h.controller.apply_total_staked(newer, "12".into()));
        assert!(!h.controller.apply_total_staked(older, "9".into()));
        assert_eq!(h.controller.total_staked(), "12");
    }
}
