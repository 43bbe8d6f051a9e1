//! # Lot Allocation State Machine
//!
//! Walks an operator through selecting inventory lots for every lot-tracked
//! constituent product of a combo, for a given number of combo sets,
//! producing a complete, validated list of [`LotSelection`].
//!
//! ## Run Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Allocation Run Lifecycle                           │
//! │                                                                         │
//! │  start(combo, set_count, warehouse)                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  item 0 ──offer_lots──► select_lot / split_lot ──advance──► item 1      │
//! │       ▲                                                      │          │
//! │       └──────────────────────── back ────────────────────────┘          │
//! │                                                              │          │
//! │                          (last item) advance ──► Complete    ▼          │
//! │                                                      │                  │
//! │                              confirm() ──► Vec<LotSelection>            │
//! │                              cancel()  ──► dropped, no side effects     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The run is an explicit state object constructed fresh per invocation; it
//! mutates nothing outside itself until `confirm()` hands the selections to
//! the caller. There is no timeout: the run ends only on explicit confirm
//! or cancel.

use chrono::NaiveDate;

use crate::error::{AllocationError, AllocationResult};
use crate::expiry;
use crate::types::{Combo, ComboItem, LotSelection, ProductLot};
use crate::MAX_COMBO_SETS;

// =============================================================================
// Step Outcome
// =============================================================================

/// Outcome of a successful [`AllocationRun::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Moved to the next constituent item; fetch its lots next.
    Next,
    /// All items are satisfied; the run may now be confirmed.
    Complete,
}

// =============================================================================
// Allocation Run
// =============================================================================

/// One in-progress allocation of lots to a combo build.
///
/// ## Invariants
/// - For every item, selections stay within `[0, required]` at all times;
///   `advance` demands exactly `required`.
/// - A single selection never exceeds its lot's on-hand quantity.
/// - Selections survive `back()` so the operator can revise them.
#[derive(Debug, Clone)]
pub struct AllocationRun {
    combo_id: String,
    warehouse_id: String,
    set_count: i64,
    /// Lot-tracked constituent items, in combo order.
    items: Vec<ComboItem>,
    /// Selections per item, parallel to `items`.
    selections: Vec<Vec<LotSelection>>,
    /// Index of the item currently being allocated.
    cursor: usize,
    complete: bool,
}

impl AllocationRun {
    /// Starts an allocation run for `set_count` sets of `combo`.
    ///
    /// Pool-stocked (non-lot-tracked) items need no lot choice and are
    /// skipped; a combo with none of its items lot-tracked completes
    /// immediately with an empty selection list.
    pub fn start(
        combo: &Combo,
        set_count: i64,
        warehouse_id: impl Into<String>,
    ) -> AllocationResult<Self> {
        if set_count < 1 || set_count > MAX_COMBO_SETS {
            return Err(AllocationError::InvalidSetCount {
                requested: set_count,
                max: MAX_COMBO_SETS,
            });
        }

        let items: Vec<ComboItem> = combo.lot_tracked_items().cloned().collect();
        let selections = vec![Vec::new(); items.len()];
        let complete = items.is_empty();

        Ok(AllocationRun {
            combo_id: combo.id.clone(),
            warehouse_id: warehouse_id.into(),
            set_count,
            items,
            selections,
            cursor: 0,
            complete,
        })
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn combo_id(&self) -> &str {
        &self.combo_id
    }

    pub fn warehouse_id(&self) -> &str {
        &self.warehouse_id
    }

    pub fn set_count(&self) -> i64 {
        self.set_count
    }

    /// Number of lot-tracked items the run walks through.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Zero-based index of the item currently being allocated.
    pub fn current_index(&self) -> usize {
        self.cursor
    }

    /// The item currently being allocated, or `None` once complete.
    pub fn current_item(&self) -> Option<&ComboItem> {
        if self.complete {
            None
        } else {
            self.items.get(self.cursor)
        }
    }

    /// Units of the current item required: `quantity_per_set × set_count`.
    /// Zero once the run is complete.
    pub fn required_quantity(&self) -> i64 {
        self.current_item()
            .map(|item| item.quantity_per_set * self.set_count)
            .unwrap_or(0)
    }

    /// Units already allocated to the current item across its selections.
    pub fn allocated_quantity(&self) -> i64 {
        self.current_selections().iter().map(|s| s.quantity).sum()
    }

    /// Selections recorded for the current item.
    pub fn current_selections(&self) -> &[LotSelection] {
        if self.complete {
            &[]
        } else {
            self.selections
                .get(self.cursor)
                .map(Vec::as_slice)
                .unwrap_or(&[])
        }
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    // -------------------------------------------------------------------------
    // Lot Offering
    // -------------------------------------------------------------------------

    /// Feeds a fetched lot list into the run for the current item.
    ///
    /// Filters out lots with no stock or belonging to another product, sorts
    /// the remainder most-urgent-expiry-first, and returns the display list.
    ///
    /// ## Auto-Select
    /// If exactly one eligible lot remains and no selection exists yet for
    /// the current item, it is selected with
    /// `quantity = min(lot on-hand, required)` - a usability shortcut, not a
    /// correctness requirement. In every other circumstance the operator
    /// chooses.
    pub fn offer_lots(
        &mut self,
        lots: &[ProductLot],
        today: NaiveDate,
    ) -> AllocationResult<Vec<ProductLot>> {
        let item = self
            .current_item()
            .ok_or(AllocationError::AlreadyComplete)?;

        let mut eligible: Vec<ProductLot> = lots
            .iter()
            .filter(|lot| lot.product_id == item.product_id && lot.has_stock())
            .cloned()
            .collect();
        expiry::sort_by_urgency(&mut eligible, today);

        if eligible.len() == 1 && self.current_selections().is_empty() {
            let lot = &eligible[0];
            let quantity = lot.quantity.min(self.required_quantity());
            self.select_lot(lot, quantity)?;
        }

        Ok(eligible)
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// Records the selection for the current item, replacing any prior
    /// selections (the guided single-lot path).
    ///
    /// ## Constraint
    /// `quantity` must lie in `[1, min(lot on-hand, required)]`.
    pub fn select_lot(&mut self, lot: &ProductLot, quantity: i64) -> AllocationResult<()> {
        let selection = self.check_selection(lot, quantity, self.required_quantity())?;
        self.selections[self.cursor] = vec![selection];
        Ok(())
    }

    /// Appends (or adjusts) a selection against a further lot, splitting the
    /// current item's requirement across multiple lots.
    ///
    /// The guided flow uses [`select_lot`](Self::select_lot); splitting is
    /// the explicit path for when no single lot covers the requirement.
    /// One selection per lot: splitting onto an already-selected lot
    /// adjusts that selection's quantity.
    pub fn split_lot(&mut self, lot: &ProductLot, quantity: i64) -> AllocationResult<()> {
        if self.complete {
            return Err(AllocationError::AlreadyComplete);
        }
        let required = self.required_quantity();
        let existing: i64 = self
            .current_selections()
            .iter()
            .filter(|s| s.lot_id == lot.id)
            .map(|s| s.quantity)
            .sum();
        let allocated_elsewhere = self.allocated_quantity() - existing;
        let headroom = required - allocated_elsewhere;

        if quantity > headroom {
            return Err(AllocationError::SplitExceedsRequirement {
                lot_number: lot.lot_number.clone(),
                requested: quantity,
                required,
            });
        }

        let selection = self.check_selection(lot, quantity, headroom)?;
        let slots = &mut self.selections[self.cursor];
        if let Some(slot) = slots.iter_mut().find(|s| s.lot_id == lot.id) {
            *slot = selection;
        } else {
            slots.push(selection);
        }
        Ok(())
    }

    /// Discards all selections for the current item.
    pub fn clear_selections(&mut self) {
        if !self.complete {
            self.selections[self.cursor].clear();
        }
    }

    /// Validates eligibility and quantity range, building the selection.
    fn check_selection(
        &self,
        lot: &ProductLot,
        quantity: i64,
        cap: i64,
    ) -> AllocationResult<LotSelection> {
        let item = self
            .current_item()
            .ok_or(AllocationError::AlreadyComplete)?;

        if lot.product_id != item.product_id || !lot.has_stock() {
            return Err(AllocationError::LotNotEligible {
                lot_number: lot.lot_number.clone(),
                product_id: item.product_id.clone(),
            });
        }

        let max = lot.quantity.min(cap);
        if quantity < 1 || quantity > max {
            return Err(AllocationError::QuantityOutOfRange {
                lot_number: lot.lot_number.clone(),
                requested: quantity,
                max,
            });
        }

        Ok(LotSelection {
            lot_id: lot.id.clone(),
            lot_number: lot.lot_number.clone(),
            product_id: item.product_id.clone(),
            quantity,
        })
    }

    // -------------------------------------------------------------------------
    // Stepping
    // -------------------------------------------------------------------------

    /// Advances to the next constituent item.
    ///
    /// ## Precondition
    /// Selections for the current item must sum to the required quantity
    /// exactly - not less, not more. Otherwise the advance is rejected and
    /// no state changes; the operator corrects the selection and retries.
    pub fn advance(&mut self) -> AllocationResult<Step> {
        let item = self
            .current_item()
            .ok_or(AllocationError::AlreadyComplete)?;
        let product_id = item.product_id.clone();
        let required = self.required_quantity();
        let allocated = self.allocated_quantity();

        if self.current_selections().is_empty() {
            return Err(AllocationError::SelectionIncomplete {
                product_id,
                required,
            });
        }
        if allocated != required {
            return Err(AllocationError::QuantityMismatch {
                product_id,
                required,
                allocated,
            });
        }

        if self.cursor + 1 == self.items.len() {
            self.complete = true;
            Ok(Step::Complete)
        } else {
            self.cursor += 1;
            Ok(Step::Next)
        }
    }

    /// Moves to the previous constituent item, if any.
    ///
    /// Prior selections are retained (not cleared), allowing revision.
    /// Returns whether a move happened.
    pub fn back(&mut self) -> bool {
        if !self.complete && self.cursor > 0 {
            self.cursor -= 1;
            true
        } else {
            false
        }
    }

    // -------------------------------------------------------------------------
    // Termination
    // -------------------------------------------------------------------------

    /// Terminates the run successfully, emitting the full selection list.
    ///
    /// Only valid once every item has been advanced past; otherwise the run
    /// is left unchanged conceptually and [`AllocationError::NotComplete`]
    /// is returned (the value is consumed either way, matching the one-shot
    /// nature of a run).
    pub fn confirm(self) -> AllocationResult<Vec<LotSelection>> {
        if !self.complete {
            return Err(AllocationError::NotComplete {
                remaining: self.items.len() - self.cursor,
            });
        }
        Ok(self.selections.into_iter().flatten().collect())
    }

    /// Cancels the run, discarding all selections. No external side effects
    /// exist to undo: the run only ever mutated itself.
    pub fn cancel(self) {}
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn combo_item(product_id: &str, per_set: i64, lot_tracked: bool) -> ComboItem {
        ComboItem {
            product_id: product_id.to_string(),
            product_name: product_id.to_uppercase(),
            quantity_per_set: per_set,
            lot_tracked,
        }
    }

    fn combo(items: Vec<ComboItem>) -> Combo {
        Combo {
            id: "combo-1".to_string(),
            name: "Flu pack".to_string(),
            is_active: true,
            items,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn lot(id: &str, product_id: &str, quantity: i64, expiry: Option<NaiveDate>) -> ProductLot {
        ProductLot {
            id: id.to_string(),
            product_id: product_id.to_string(),
            warehouse_id: "w-1".to_string(),
            lot_number: id.to_uppercase(),
            batch_code: None,
            expiry_date: expiry,
            quantity,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn in_days(days: i64) -> NaiveDate {
        today() + chrono::Duration::days(days)
    }

    #[test]
    fn test_invalid_set_count_rejected() {
        let c = combo(vec![combo_item("a", 2, true)]);
        assert!(matches!(
            AllocationRun::start(&c, 0, "w-1"),
            Err(AllocationError::InvalidSetCount { .. })
        ));
        assert!(matches!(
            AllocationRun::start(&c, -3, "w-1"),
            Err(AllocationError::InvalidSetCount { .. })
        ));
        assert!(matches!(
            AllocationRun::start(&c, 1000, "w-1"),
            Err(AllocationError::InvalidSetCount { .. })
        ));
    }

    #[test]
    fn test_no_lot_tracked_items_completes_immediately() {
        let c = combo(vec![combo_item("a", 2, false)]);
        let run = AllocationRun::start(&c, 3, "w-1").unwrap();
        assert!(run.is_complete());
        assert_eq!(run.confirm().unwrap(), vec![]);
    }

    /// 2 units per set, 3 sets: required = 6. Lot L1 (qty 4, expires in
    /// 2 days) and L2 (qty 10, no expiry). Selecting L1 for 4 and L2 for 2
    /// totals 6 and the advance succeeds; selecting only L1 for 4 is a
    /// quantity mismatch.
    #[test]
    fn test_split_allocation_scenario() {
        let c = combo(vec![combo_item("a", 2, true)]);
        let l1 = lot("l1", "a", 4, Some(in_days(2)));
        let l2 = lot("l2", "a", 10, None);

        let mut run = AllocationRun::start(&c, 3, "w-1").unwrap();
        assert_eq!(run.required_quantity(), 6);

        // Two eligible lots: no auto-select, most urgent first.
        let offered = run
            .offer_lots(&[l2.clone(), l1.clone()], today())
            .unwrap();
        assert_eq!(offered.len(), 2);
        assert_eq!(offered[0].id, "l1");
        assert!(run.current_selections().is_empty());

        // Only 4 of 6: advance rejected, state unchanged.
        run.select_lot(&l1, 4).unwrap();
        let err = run.advance().unwrap_err();
        assert!(matches!(
            err,
            AllocationError::QuantityMismatch {
                required: 6,
                allocated: 4,
                ..
            }
        ));
        assert_eq!(run.current_index(), 0);

        // Split the remaining 2 onto L2 and the advance completes the run.
        run.split_lot(&l2, 2).unwrap();
        assert_eq!(run.allocated_quantity(), 6);
        assert_eq!(run.advance().unwrap(), Step::Complete);

        let selections = run.confirm().unwrap();
        assert_eq!(selections.len(), 2);
        assert_eq!(selections[0].lot_id, "l1");
        assert_eq!(selections[0].quantity, 4);
        assert_eq!(selections[1].lot_id, "l2");
        assert_eq!(selections[1].quantity, 2);
    }

    #[test]
    fn test_advance_without_selection_is_incomplete() {
        let c = combo(vec![combo_item("a", 1, true)]);
        let mut run = AllocationRun::start(&c, 2, "w-1").unwrap();
        assert!(matches!(
            run.advance(),
            Err(AllocationError::SelectionIncomplete { required: 2, .. })
        ));
    }

    #[test]
    fn test_over_allocation_rejected() {
        let c = combo(vec![combo_item("a", 1, true)]);
        let big = lot("l1", "a", 50, None);
        let mut run = AllocationRun::start(&c, 3, "w-1").unwrap();

        // required = 3, lot holds 50: cap is the requirement.
        assert!(matches!(
            run.select_lot(&big, 4),
            Err(AllocationError::QuantityOutOfRange { max: 3, .. })
        ));
        assert!(matches!(
            run.select_lot(&big, 0),
            Err(AllocationError::QuantityOutOfRange { .. })
        ));
        run.select_lot(&big, 3).unwrap();
    }

    #[test]
    fn test_selection_capped_by_lot_stock() {
        let c = combo(vec![combo_item("a", 5, true)]);
        let small = lot("l1", "a", 2, None);
        let mut run = AllocationRun::start(&c, 1, "w-1").unwrap();

        // required = 5 but the lot only holds 2.
        assert!(matches!(
            run.select_lot(&small, 3),
            Err(AllocationError::QuantityOutOfRange { max: 2, .. })
        ));
        run.select_lot(&small, 2).unwrap();
    }

    #[test]
    fn test_wrong_product_lot_not_eligible() {
        let c = combo(vec![combo_item("a", 1, true)]);
        let other = lot("l9", "z", 10, None);
        let mut run = AllocationRun::start(&c, 1, "w-1").unwrap();
        assert!(matches!(
            run.select_lot(&other, 1),
            Err(AllocationError::LotNotEligible { .. })
        ));
    }

    #[test]
    fn test_auto_select_fires_on_single_eligible_lot() {
        let c = combo(vec![combo_item("a", 2, true)]);
        let only = lot("l1", "a", 4, Some(in_days(30)));
        let empty = lot("l2", "a", 0, None);
        let mut run = AllocationRun::start(&c, 3, "w-1").unwrap();

        // The zero-quantity lot is filtered, leaving exactly one eligible.
        let offered = run
            .offer_lots(&[only.clone(), empty], today())
            .unwrap();
        assert_eq!(offered.len(), 1);

        // required = 6, on-hand 4: auto-selected at min(4, 6) = 4.
        let selections = run.current_selections();
        assert_eq!(selections.len(), 1);
        assert_eq!(selections[0].lot_id, "l1");
        assert_eq!(selections[0].quantity, 4);
    }

    #[test]
    fn test_auto_select_does_not_fire_with_two_eligible_lots() {
        let c = combo(vec![combo_item("a", 2, true)]);
        let l1 = lot("l1", "a", 4, None);
        let l2 = lot("l2", "a", 9, None);
        let mut run = AllocationRun::start(&c, 1, "w-1").unwrap();

        run.offer_lots(&[l1, l2], today()).unwrap();
        assert!(run.current_selections().is_empty());
    }

    #[test]
    fn test_auto_select_does_not_override_existing_selection() {
        let c = combo(vec![combo_item("a", 2, true)]);
        let l1 = lot("l1", "a", 10, None);
        let mut run = AllocationRun::start(&c, 1, "w-1").unwrap();

        run.select_lot(&l1, 1).unwrap();
        // Refreshing the lot list must not clobber the operator's choice.
        run.offer_lots(&[l1], today()).unwrap();
        assert_eq!(run.current_selections()[0].quantity, 1);
    }

    #[test]
    fn test_select_replaces_previous_selection() {
        let c = combo(vec![combo_item("a", 2, true)]);
        let l1 = lot("l1", "a", 10, None);
        let l2 = lot("l2", "a", 10, None);
        let mut run = AllocationRun::start(&c, 1, "w-1").unwrap();

        run.select_lot(&l1, 2).unwrap();
        run.select_lot(&l2, 2).unwrap();

        let selections = run.current_selections();
        assert_eq!(selections.len(), 1);
        assert_eq!(selections[0].lot_id, "l2");
    }

    #[test]
    fn test_split_onto_same_lot_adjusts_quantity() {
        let c = combo(vec![combo_item("a", 3, true)]);
        let l1 = lot("l1", "a", 10, None);
        let mut run = AllocationRun::start(&c, 1, "w-1").unwrap();

        run.split_lot(&l1, 1).unwrap();
        run.split_lot(&l1, 3).unwrap();

        let selections = run.current_selections();
        assert_eq!(selections.len(), 1);
        assert_eq!(selections[0].quantity, 3);
    }

    #[test]
    fn test_split_exceeding_requirement_rejected() {
        let c = combo(vec![combo_item("a", 2, true)]);
        let l1 = lot("l1", "a", 10, None);
        let l2 = lot("l2", "a", 10, None);
        let mut run = AllocationRun::start(&c, 1, "w-1").unwrap();

        run.select_lot(&l1, 1).unwrap();
        assert!(matches!(
            run.split_lot(&l2, 2),
            Err(AllocationError::SplitExceedsRequirement { .. })
        ));
    }

    #[test]
    fn test_back_retains_selections() {
        let c = combo(vec![combo_item("a", 1, true), combo_item("b", 1, true)]);
        let la = lot("la", "a", 5, None);
        let lb = lot("lb", "b", 5, None);
        let mut run = AllocationRun::start(&c, 1, "w-1").unwrap();

        run.select_lot(&la, 1).unwrap();
        assert_eq!(run.advance().unwrap(), Step::Next);
        run.select_lot(&lb, 1).unwrap();

        assert!(run.back());
        assert_eq!(run.current_item().unwrap().product_id, "a");
        assert_eq!(run.current_selections()[0].lot_id, "la");

        // Both items still satisfied: walking forward again completes.
        assert_eq!(run.advance().unwrap(), Step::Next);
        assert_eq!(run.current_selections()[0].lot_id, "lb");
        assert_eq!(run.advance().unwrap(), Step::Complete);
    }

    #[test]
    fn test_back_at_first_item_is_a_no_op() {
        let c = combo(vec![combo_item("a", 1, true)]);
        let mut run = AllocationRun::start(&c, 1, "w-1").unwrap();
        assert!(!run.back());
        assert_eq!(run.current_index(), 0);
    }

    #[test]
    fn test_confirm_before_complete_rejected() {
        let c = combo(vec![combo_item("a", 1, true), combo_item("b", 1, true)]);
        let run = AllocationRun::start(&c, 1, "w-1").unwrap();
        assert!(matches!(
            run.confirm(),
            Err(AllocationError::NotComplete { remaining: 2 })
        ));
    }

    #[test]
    fn test_operations_after_completion_rejected() {
        let c = combo(vec![combo_item("a", 1, true)]);
        let la = lot("la", "a", 5, None);
        let mut run = AllocationRun::start(&c, 1, "w-1").unwrap();

        run.select_lot(&la, 1).unwrap();
        assert_eq!(run.advance().unwrap(), Step::Complete);

        assert!(matches!(
            run.advance(),
            Err(AllocationError::AlreadyComplete)
        ));
        assert!(matches!(
            run.select_lot(&la, 1),
            Err(AllocationError::AlreadyComplete)
        ));
        assert!(matches!(
            run.offer_lots(&[la.clone()], today()),
            Err(AllocationError::AlreadyComplete)
        ));
        assert!(!run.back());
    }

    /// Confirmed runs satisfy the exact-sum invariant for every item, and
    /// every selection lies within [1, min(lot stock, required)].
    #[test]
    fn test_confirmed_run_invariants() {
        let c = combo(vec![combo_item("a", 2, true), combo_item("b", 3, true)]);
        let la1 = lot("la1", "a", 3, Some(in_days(5)));
        let la2 = lot("la2", "a", 8, None);
        let lb = lot("lb", "b", 20, None);
        let set_count = 2;
        let mut run = AllocationRun::start(&c, set_count, "w-1").unwrap();

        run.select_lot(&la1, 3).unwrap();
        run.split_lot(&la2, 1).unwrap();
        assert_eq!(run.advance().unwrap(), Step::Next);
        run.select_lot(&lb, 6).unwrap();
        assert_eq!(run.advance().unwrap(), Step::Complete);

        let selections = run.confirm().unwrap();

        let sum_a: i64 = selections
            .iter()
            .filter(|s| s.product_id == "a")
            .map(|s| s.quantity)
            .sum();
        let sum_b: i64 = selections
            .iter()
            .filter(|s| s.product_id == "b")
            .map(|s| s.quantity)
            .sum();
        assert_eq!(sum_a, 2 * set_count);
        assert_eq!(sum_b, 3 * set_count);
        assert!(selections.iter().all(|s| s.quantity >= 1));
    }
}
