//! # Allocation Session
//!
//! The I/O driver around [`apotek_core::AllocationRun`]: fetches lots from
//! an [`InventoryStore`] as the operator steps through the combo's
//! lot-tracked items, and relays selections into the pure state machine.
//!
//! The session is driven by discrete user-triggered steps with no background
//! work in between; every call is plain request/response. Cancelling (or
//! just dropping) a session has no external side effects: only `confirm()`
//! hands anything to the caller, and nothing is written to the inventory
//! store from here.

use chrono::Utc;
use tracing::debug;

use apotek_core::{AllocationError, AllocationRun, Combo, ComboItem, LotSelection, ProductLot, Step};

use crate::error::{PosError, PosResult};
use crate::stores::InventoryStore;

/// One operator-driven allocation run bound to an inventory store.
#[derive(Debug)]
pub struct AllocationSession<I> {
    inventory: I,
    run: AllocationRun,
    /// Eligible lots last fetched for the current item (display order).
    lots: Vec<ProductLot>,
}

impl<I> AllocationSession<I>
where
    I: InventoryStore,
{
    /// Starts a session and fetches lots for the first lot-tracked item.
    ///
    /// A combo with no lot-tracked items yields an already-complete session;
    /// `confirm()` then returns an empty selection list.
    pub async fn start(
        inventory: I,
        combo: &Combo,
        set_count: i64,
        warehouse_id: &str,
    ) -> PosResult<Self> {
        let run = AllocationRun::start(combo, set_count, warehouse_id)?;
        let mut session = AllocationSession {
            inventory,
            run,
            lots: Vec::new(),
        };
        if !session.run.is_complete() {
            session.refresh_lots().await?;
        }
        Ok(session)
    }

    /// Re-fetches lots for the current item.
    ///
    /// Retryable: a failed lookup surfaces as [`PosError::LotLookup`] and
    /// leaves the run untouched, so the operator can simply invoke the
    /// fetch again.
    pub async fn refresh_lots(&mut self) -> PosResult<&[ProductLot]> {
        let product_id = self
            .run
            .current_item()
            .map(|item| item.product_id.clone())
            .ok_or(AllocationError::AlreadyComplete)?;

        let fetched = self
            .inventory
            .lots_for_product(&product_id, self.run.warehouse_id())
            .await
            .map_err(PosError::LotLookup)?;
        debug!(
            product_id = %product_id,
            fetched = fetched.len(),
            "Fetched lots for allocation"
        );

        self.lots = self.run.offer_lots(&fetched, Utc::now().date_naive())?;
        Ok(&self.lots)
    }

    /// Records the selection for the current item (replacing any prior one),
    /// resolving the lot from the last fetched list.
    pub fn select_lot(&mut self, lot_id: &str, quantity: i64) -> PosResult<()> {
        let lot = self.find_lot(lot_id)?;
        self.run.select_lot(&lot, quantity)?;
        Ok(())
    }

    /// Splits the current item's requirement onto a further lot.
    pub fn split_lot(&mut self, lot_id: &str, quantity: i64) -> PosResult<()> {
        let lot = self.find_lot(lot_id)?;
        self.run.split_lot(&lot, quantity)?;
        Ok(())
    }

    /// Discards all selections for the current item.
    pub fn clear_selections(&mut self) {
        self.run.clear_selections();
    }

    /// Advances to the next item, fetching its lots; on the last item,
    /// completes the run.
    ///
    /// Rejected (with no state change) while the current item's selections
    /// do not sum to the required quantity exactly.
    pub async fn advance(&mut self) -> PosResult<Step> {
        let step = self.run.advance()?;
        match step {
            Step::Next => {
                self.refresh_lots().await?;
            }
            Step::Complete => {
                self.lots.clear();
            }
        }
        Ok(step)
    }

    /// Moves back to the previous item, retaining its selections. The lot
    /// list is stale afterwards; call [`refresh_lots`](Self::refresh_lots)
    /// to repopulate it.
    pub fn back(&mut self) -> bool {
        let moved = self.run.back();
        if moved {
            self.lots.clear();
        }
        moved
    }

    /// Terminates successfully, emitting the full selection list.
    pub fn confirm(self) -> PosResult<Vec<LotSelection>> {
        Ok(self.run.confirm()?)
    }

    /// Discards the run. No side effects exist to undo.
    pub fn cancel(self) {
        self.run.cancel();
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn current_item(&self) -> Option<&ComboItem> {
        self.run.current_item()
    }

    pub fn required_quantity(&self) -> i64 {
        self.run.required_quantity()
    }

    pub fn allocated_quantity(&self) -> i64 {
        self.run.allocated_quantity()
    }

    pub fn current_selections(&self) -> &[LotSelection] {
        self.run.current_selections()
    }

    /// Eligible lots last fetched for the current item.
    pub fn lots(&self) -> &[ProductLot] {
        &self.lots
    }

    pub fn is_complete(&self) -> bool {
        self.run.is_complete()
    }

    /// Looks a lot up in the last fetched list.
    fn find_lot(&self, lot_id: &str) -> PosResult<ProductLot> {
        self.lots
            .iter()
            .find(|lot| lot.id == lot_id)
            .cloned()
            .ok_or_else(|| {
                PosError::Allocation(AllocationError::LotNotEligible {
                    lot_number: lot_id.to_string(),
                    product_id: self
                        .run
                        .current_item()
                        .map(|item| item.product_id.clone())
                        .unwrap_or_default(),
                })
            })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
