//! Ordering and pinning engine for an owner's project list.
//!
//! Every operation takes an explicit [`OwnerSnapshot`] (read inside the
//! caller's transaction, under a locking read) and returns a plan of ledger
//! mutations. The engine holds no state and never performs I/O; the
//! repository layer applies the plan.
//!
//! Invariants the plans preserve, scoped per owner:
//!
//! - at most one project is pinned;
//! - a pinned project sits at display order 0, and only a pinned project
//!   may hold 0;
//! - non-pinned display orders form a dense `1..N` sequence.
//!
//! Shifting is expressed as "make room" (increment everything at or above a
//! target order) rather than a general permutation: every caller only ever
//! opens or closes a single slot, which keeps plans O(owner's project
//! count). [`plan_normalize`] is the safety net invoked at the end of every
//! mutating operation to guarantee density even if intermediate shift
//! bookkeeping drifts.

use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// One non-pinned project row, as read inside the active transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSlot {
    pub id: DbId,
    pub display_order: i32,
    pub created_at: Timestamp,
}

/// An owner's ordering state at the start of a mutating operation.
#[derive(Debug, Clone, Default)]
pub struct OwnerSnapshot {
    /// Id of the currently pinned project, if any.
    pub pinned: Option<DbId>,
    /// All non-pinned projects for the owner, in no particular order.
    pub non_pinned: Vec<ProjectSlot>,
}

impl OwnerSnapshot {
    /// Highest non-pinned display order, or 0 when the owner has no
    /// non-pinned projects.
    pub fn max_order(&self) -> i32 {
        self.non_pinned
            .iter()
            .map(|slot| slot.display_order)
            .max()
            .unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// Plan building blocks
// ---------------------------------------------------------------------------

/// Increment by one the display order of every non-pinned row at or above
/// `from_order`, except `exclude` (the row being demoted or moved, which
/// receives its final order separately).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shift {
    pub from_order: i32,
    pub exclude: Option<DbId>,
}

/// Unpin the currently pinned project and land it at `to_order` (always 1:
/// the shift that accompanies a demotion opens the slot at the front).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Demotion {
    pub project_id: DbId,
    pub to_order: i32,
}

/// The resolved `(is_pinned, display_order)` pair for the subject row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub is_pinned: bool,
    pub display_order: i32,
}

/// A single row whose display order must change during normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderChange {
    pub project_id: DbId,
    pub new_order: i32,
}

// ---------------------------------------------------------------------------
// Plans
// ---------------------------------------------------------------------------

/// Mutations required to insert a new project.
///
/// Apply in order: `shift`, then `demote`, then insert the new row with
/// `placement`, then normalize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertPlan {
    pub placement: Placement,
    pub shift: Option<Shift>,
    pub demote: Option<Demotion>,
}

/// Mutations required to re-place an existing project.
///
/// Apply in order: shift, demotion, then write the subject's placement,
/// then normalize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdatePlan {
    /// The subject becomes the pinned project at order 0.
    Pin {
        shift: Option<Shift>,
        demote: Option<Demotion>,
    },
    /// The subject leaves the pinned slot and lands at `order`.
    Unpin { shift: Option<Shift>, order: i32 },
    /// The subject stays non-pinned and moves to `order`.
    Reorder { shift: Option<Shift>, order: i32 },
    /// No pin-state or order change was requested.
    NoChange,
}

/// Row updates that restore the dense `1..N` sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizePlan {
    pub changes: Vec<OrderChange>,
}

impl NormalizePlan {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Engine operations
// ---------------------------------------------------------------------------

/// Plan the placement of a new project.
///
/// Pinned inserts land at order 0; an existing pinned project is demoted to
/// order 1 after a +1 shift of every non-pinned order >= 1 opens the slot.
/// Non-pinned inserts append at `max + 1` unless `requested_order` falls in
/// `[1, max + 1]`; an in-range order at or below `max` requires a +1 shift
/// of everything at or above it.
pub fn plan_insert(
    snapshot: &OwnerSnapshot,
    requested_pin: bool,
    requested_order: Option<i32>,
) -> InsertPlan {
    if requested_pin {
        let (shift, demote) = demote_current_pinned(snapshot, None);
        return InsertPlan {
            placement: Placement {
                is_pinned: true,
                display_order: 0,
            },
            shift,
            demote,
        };
    }

    let (order, shift) = resolve_non_pinned_order(snapshot.max_order(), requested_order, None);
    InsertPlan {
        placement: Placement {
            is_pinned: false,
            display_order: order,
        },
        shift,
        demote: None,
    }
}

/// Plan the re-placement of an existing project.
///
/// Cases are evaluated in priority order; pin/unpin transitions dominate
/// pure reorder requests. Append-vs-explicit resolution is uniform across
/// the unpin and reorder branches: an absent or out-of-range order appends.
pub fn plan_update(
    snapshot: &OwnerSnapshot,
    project_id: DbId,
    old_pinned: bool,
    old_order: i32,
    new_pinned: bool,
    new_order: Option<i32>,
) -> UpdatePlan {
    // Case 1: was unpinned, becomes pinned.
    if new_pinned && !old_pinned {
        let (shift, demote) = demote_current_pinned(snapshot, Some(project_id));
        return UpdatePlan::Pin { shift, demote };
    }

    // Case 2: was pinned, becomes unpinned. The subject is not part of the
    // non-pinned set, so `max_order` already excludes it.
    if !new_pinned && old_pinned {
        let (order, shift) =
            resolve_non_pinned_order(snapshot.max_order(), new_order, Some(project_id));
        return UpdatePlan::Unpin { shift, order };
    }

    // Case 3: stays unpinned, order explicitly changes.
    if !new_pinned && !old_pinned {
        if let Some(requested) = new_order {
            if requested != old_order {
                let (order, shift) =
                    resolve_non_pinned_order(snapshot.max_order(), Some(requested), Some(project_id));
                if order != old_order {
                    return UpdatePlan::Reorder { shift, order };
                }
            }
        }
    }

    // Case 4: nothing to do.
    UpdatePlan::NoChange
}

/// Plan the renumbering that restores the dense `1..N` sequence.
///
/// Non-pinned rows are sorted by `(display_order, created_at)` ascending and
/// assigned `1..N` in that order; only rows whose computed order differs
/// from their current order appear in the plan. The creation-time tie-break
/// keeps the result deterministic when two rows transiently share an order
/// mid-transaction. Calling this on an already-dense sequence yields an
/// empty plan.
pub fn plan_normalize(snapshot: &OwnerSnapshot) -> NormalizePlan {
    let mut slots: Vec<&ProjectSlot> = snapshot.non_pinned.iter().collect();
    slots.sort_by(|a, b| {
        a.display_order
            .cmp(&b.display_order)
            .then(a.created_at.cmp(&b.created_at))
    });

    let changes = slots
        .iter()
        .enumerate()
        .filter_map(|(index, slot)| {
            let expected = index as i32 + 1;
            (slot.display_order != expected).then(|| OrderChange {
                project_id: slot.id,
                new_order: expected,
            })
        })
        .collect();

    NormalizePlan { changes }
}

/// Verify that a snapshot satisfies the ordering invariants.
///
/// Violations are programming errors (snapshots are read inside the owning
/// transaction), so callers assert on this rather than recover.
pub fn check_invariants(snapshot: &OwnerSnapshot) -> Result<(), String> {
    if let Some(pinned_id) = snapshot.pinned {
        if snapshot.non_pinned.iter().any(|slot| slot.id == pinned_id) {
            return Err(format!(
                "pinned project {pinned_id} also appears in the non-pinned set"
            ));
        }
    }

    let mut orders: Vec<i32> = snapshot
        .non_pinned
        .iter()
        .map(|slot| slot.display_order)
        .collect();
    orders.sort_unstable();

    for (index, order) in orders.iter().enumerate() {
        let expected = index as i32 + 1;
        if *order != expected {
            return Err(format!(
                "non-pinned display orders are not dense: expected {expected} at position {index}, found {order}"
            ));
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Demotion of the current pinned project (if any) into slot 1, with the
/// +1 shift that opens the slot. `subject` is the row being pinned in its
/// place, excluded in case the snapshot already names it as pinned.
fn demote_current_pinned(
    snapshot: &OwnerSnapshot,
    subject: Option<DbId>,
) -> (Option<Shift>, Option<Demotion>) {
    match snapshot.pinned {
        Some(pinned_id) if subject != Some(pinned_id) => (
            Some(Shift {
                from_order: 1,
                exclude: Some(pinned_id),
            }),
            Some(Demotion {
                project_id: pinned_id,
                to_order: 1,
            }),
        ),
        _ => (None, None),
    }
}

/// Resolve a requested non-pinned order against the current maximum.
///
/// Absent or out-of-range (`< 1` or `> max + 1`) requests append at
/// `max + 1` with no shift; `max + 1` itself is an append; anything in
/// `[1, max]` opens a slot with a +1 shift from that order.
fn resolve_non_pinned_order(
    max: i32,
    requested: Option<i32>,
    exclude: Option<DbId>,
) -> (i32, Option<Shift>) {
    match requested {
        Some(order) if order >= 1 && order <= max => (
            order,
            Some(Shift {
                from_order: order,
                exclude,
            }),
        ),
        Some(order) if order == max + 1 => (order, None),
        _ => (max + 1, None),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn ts(secs: i64) -> Timestamp {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn slot(id: DbId, order: i32) -> ProjectSlot {
        ProjectSlot {
            id,
            display_order: order,
            created_at: ts(id * 100),
        }
    }

    /// Snapshot with non-pinned rows at dense orders 1..=n (id == order).
    fn dense(n: i32) -> OwnerSnapshot {
        OwnerSnapshot {
            pinned: None,
            non_pinned: (1..=n).map(|i| slot(i as DbId, i)).collect(),
        }
    }

    /// Apply a plan's shift and normalization to an in-memory snapshot,
    /// mirroring what the repository layer does, so tests can assert on
    /// final invariant-satisfying states.
    fn apply_shift(snapshot: &mut OwnerSnapshot, shift: &Shift) {
        for s in &mut snapshot.non_pinned {
            if s.display_order >= shift.from_order && Some(s.id) != shift.exclude {
                s.display_order += 1;
            }
        }
    }

    fn apply_normalize(snapshot: &mut OwnerSnapshot) {
        let plan = plan_normalize(snapshot);
        for change in plan.changes {
            let s = snapshot
                .non_pinned
                .iter_mut()
                .find(|s| s.id == change.project_id)
                .unwrap();
            s.display_order = change.new_order;
        }
    }

    fn order_of(snapshot: &OwnerSnapshot, id: DbId) -> i32 {
        snapshot
            .non_pinned
            .iter()
            .find(|s| s.id == id)
            .unwrap()
            .display_order
    }

    // -----------------------------------------------------------------------
    // plan_insert: append default
    // -----------------------------------------------------------------------

    #[test]
    fn insert_without_order_appends() {
        let plan = plan_insert(&dense(3), false, None);
        assert_eq!(
            plan.placement,
            Placement {
                is_pinned: false,
                display_order: 4
            }
        );
        assert_eq!(plan.shift, None);
        assert_eq!(plan.demote, None);
    }

    #[test]
    fn insert_into_empty_owner_takes_order_one() {
        let plan = plan_insert(&OwnerSnapshot::default(), false, None);
        assert_eq!(plan.placement.display_order, 1);
        assert_eq!(plan.shift, None);
    }

    #[test]
    fn insert_with_order_zero_appends() {
        let plan = plan_insert(&dense(3), false, Some(0));
        assert_eq!(plan.placement.display_order, 4);
        assert_eq!(plan.shift, None);
    }

    #[test]
    fn insert_with_order_beyond_max_plus_one_appends() {
        let plan = plan_insert(&dense(3), false, Some(99));
        assert_eq!(plan.placement.display_order, 4);
        assert_eq!(plan.shift, None);
    }

    #[test]
    fn insert_at_max_plus_one_is_append_without_shift() {
        let plan = plan_insert(&dense(3), false, Some(4));
        assert_eq!(plan.placement.display_order, 4);
        assert_eq!(plan.shift, None);
    }

    // -----------------------------------------------------------------------
    // plan_insert: insert-with-shift
    // -----------------------------------------------------------------------

    #[test]
    fn insert_in_range_shifts_from_target() {
        let plan = plan_insert(&dense(3), false, Some(2));
        assert_eq!(plan.placement.display_order, 2);
        assert_eq!(
            plan.shift,
            Some(Shift {
                from_order: 2,
                exclude: None
            })
        );
    }

    #[test]
    fn insert_at_two_moves_previous_occupants_to_three_and_four() {
        let mut snapshot = dense(3);
        let plan = plan_insert(&snapshot, false, Some(2));
        apply_shift(&mut snapshot, &plan.shift.unwrap());
        snapshot.non_pinned.push(ProjectSlot {
            id: 42,
            display_order: plan.placement.display_order,
            created_at: ts(9_999),
        });
        apply_normalize(&mut snapshot);

        assert_eq!(order_of(&snapshot, 1), 1);
        assert_eq!(order_of(&snapshot, 42), 2);
        assert_eq!(order_of(&snapshot, 2), 3);
        assert_eq!(order_of(&snapshot, 3), 4);
        assert!(check_invariants(&snapshot).is_ok());
    }

    // -----------------------------------------------------------------------
    // plan_insert: pinning
    // -----------------------------------------------------------------------

    #[test]
    fn pinned_insert_with_no_existing_pin_takes_slot_zero() {
        let plan = plan_insert(&dense(2), true, Some(7));
        assert_eq!(
            plan.placement,
            Placement {
                is_pinned: true,
                display_order: 0
            }
        );
        assert_eq!(plan.shift, None);
        assert_eq!(plan.demote, None);
    }

    #[test]
    fn pinned_insert_demotes_existing_pinned_to_one() {
        let snapshot = OwnerSnapshot {
            pinned: Some(10),
            non_pinned: vec![slot(1, 1), slot(2, 2)],
        };
        let plan = plan_insert(&snapshot, true, None);
        assert_eq!(plan.placement.display_order, 0);
        assert_eq!(
            plan.shift,
            Some(Shift {
                from_order: 1,
                exclude: Some(10)
            })
        );
        assert_eq!(
            plan.demote,
            Some(Demotion {
                project_id: 10,
                to_order: 1
            })
        );
    }

    // -----------------------------------------------------------------------
    // plan_update: pin transitions
    // -----------------------------------------------------------------------

    #[test]
    fn pin_exclusivity_demotes_and_shifts_everyone_else() {
        // A (id 10) is pinned; B (id 2, order 2) becomes pinned.
        let snapshot = OwnerSnapshot {
            pinned: Some(10),
            non_pinned: vec![slot(1, 1), slot(2, 2), slot(3, 3)],
        };
        let plan = plan_update(&snapshot, 2, false, 2, true, None);
        match plan {
            UpdatePlan::Pin { shift, demote } => {
                assert_eq!(
                    shift,
                    Some(Shift {
                        from_order: 1,
                        exclude: Some(10)
                    })
                );
                assert_eq!(
                    demote,
                    Some(Demotion {
                        project_id: 10,
                        to_order: 1
                    })
                );
            }
            other => panic!("expected Pin plan, got {other:?}"),
        }
    }

    #[test]
    fn pin_exclusivity_end_state() {
        // Full end-to-end of the property: A pinned, B at 2 gets pinned.
        // A lands at 1, B at 0, and normalize closes the slot B vacated so
        // the remaining non-pinned rows occupy 1..3 densely.
        let mut snapshot = OwnerSnapshot {
            pinned: Some(10),
            non_pinned: vec![slot(1, 1), slot(2, 2), slot(3, 3)],
        };
        let plan = plan_update(&snapshot, 2, false, 2, true, None);
        let UpdatePlan::Pin { shift, demote } = plan else {
            panic!("expected Pin plan");
        };

        apply_shift(&mut snapshot, &shift.unwrap());
        let demote = demote.unwrap();
        snapshot.non_pinned.push(ProjectSlot {
            id: demote.project_id,
            display_order: demote.to_order,
            created_at: ts(0),
        });
        // Subject becomes the pinned row.
        snapshot.non_pinned.retain(|s| s.id != 2);
        snapshot.pinned = Some(2);
        apply_normalize(&mut snapshot);

        assert_eq!(order_of(&snapshot, 10), 1);
        assert_eq!(order_of(&snapshot, 1), 2);
        assert_eq!(order_of(&snapshot, 3), 3);
        assert!(check_invariants(&snapshot).is_ok());
    }

    #[test]
    fn pinning_when_no_pin_exists_needs_no_demotion() {
        let plan = plan_update(&dense(3), 2, false, 2, true, None);
        assert_eq!(
            plan,
            UpdatePlan::Pin {
                shift: None,
                demote: None
            }
        );
    }

    #[test]
    fn pinning_an_already_pinned_project_is_a_no_op() {
        let snapshot = OwnerSnapshot {
            pinned: Some(5),
            non_pinned: vec![slot(1, 1)],
        };
        let plan = plan_update(&snapshot, 5, true, 0, true, Some(3));
        assert_eq!(plan, UpdatePlan::NoChange);
    }

    // -----------------------------------------------------------------------
    // plan_update: unpin transitions
    // -----------------------------------------------------------------------

    #[test]
    fn unpin_without_order_appends() {
        let snapshot = OwnerSnapshot {
            pinned: Some(5),
            non_pinned: vec![slot(1, 1), slot(2, 2)],
        };
        let plan = plan_update(&snapshot, 5, true, 0, false, None);
        assert_eq!(
            plan,
            UpdatePlan::Unpin {
                shift: None,
                order: 3
            }
        );
    }

    #[test]
    fn unpin_with_explicit_order_shifts_excluding_subject() {
        let snapshot = OwnerSnapshot {
            pinned: Some(5),
            non_pinned: vec![slot(1, 1), slot(2, 2)],
        };
        let plan = plan_update(&snapshot, 5, true, 0, false, Some(1));
        assert_eq!(
            plan,
            UpdatePlan::Unpin {
                shift: Some(Shift {
                    from_order: 1,
                    exclude: Some(5)
                }),
                order: 1
            }
        );
    }

    #[test]
    fn unpin_with_out_of_range_order_appends() {
        let snapshot = OwnerSnapshot {
            pinned: Some(5),
            non_pinned: vec![slot(1, 1), slot(2, 2)],
        };
        let plan = plan_update(&snapshot, 5, true, 0, false, Some(40));
        assert_eq!(
            plan,
            UpdatePlan::Unpin {
                shift: None,
                order: 3
            }
        );
    }

    // -----------------------------------------------------------------------
    // plan_update: plain reorder
    // -----------------------------------------------------------------------

    #[test]
    fn reorder_shifts_excluding_the_moving_project() {
        let plan = plan_update(&dense(4), 3, false, 3, false, Some(1));
        assert_eq!(
            plan,
            UpdatePlan::Reorder {
                shift: Some(Shift {
                    from_order: 1,
                    exclude: Some(3)
                }),
                order: 1
            }
        );
    }

    #[test]
    fn reorder_to_same_order_is_a_no_op() {
        let plan = plan_update(&dense(4), 3, false, 3, false, Some(3));
        assert_eq!(plan, UpdatePlan::NoChange);
    }

    #[test]
    fn reorder_without_order_is_a_no_op() {
        let plan = plan_update(&dense(4), 3, false, 3, false, None);
        assert_eq!(plan, UpdatePlan::NoChange);
    }

    #[test]
    fn reorder_beyond_max_appends() {
        let plan = plan_update(&dense(4), 2, false, 2, false, Some(99));
        assert_eq!(
            plan,
            UpdatePlan::Reorder {
                shift: None,
                order: 5
            }
        );
    }

    #[test]
    fn reorder_upwards_end_state() {
        // {1,2,3,4}: move id 3 (order 3) to order 1.
        let mut snapshot = dense(4);
        let UpdatePlan::Reorder { shift, order } =
            plan_update(&snapshot, 3, false, 3, false, Some(1))
        else {
            panic!("expected Reorder plan");
        };
        if let Some(shift) = shift {
            apply_shift(&mut snapshot, &shift);
        }
        snapshot
            .non_pinned
            .iter_mut()
            .find(|s| s.id == 3)
            .unwrap()
            .display_order = order;
        apply_normalize(&mut snapshot);

        assert_eq!(order_of(&snapshot, 3), 1);
        assert_eq!(order_of(&snapshot, 1), 2);
        assert_eq!(order_of(&snapshot, 2), 3);
        assert_eq!(order_of(&snapshot, 4), 4);
        assert!(check_invariants(&snapshot).is_ok());
    }

    // -----------------------------------------------------------------------
    // plan_normalize
    // -----------------------------------------------------------------------

    #[test]
    fn normalize_of_dense_sequence_is_empty() {
        assert!(plan_normalize(&dense(5)).is_empty());
    }

    #[test]
    fn normalize_closes_gap_after_delete() {
        // {1,2,3,4} with the project at order 2 deleted.
        let snapshot = OwnerSnapshot {
            pinned: None,
            non_pinned: vec![slot(1, 1), slot(3, 3), slot(4, 4)],
        };
        let plan = plan_normalize(&snapshot);
        assert_eq!(
            plan.changes,
            vec![
                OrderChange {
                    project_id: 3,
                    new_order: 2
                },
                OrderChange {
                    project_id: 4,
                    new_order: 3
                },
            ]
        );
    }

    #[test]
    fn normalize_is_idempotent() {
        let mut snapshot = OwnerSnapshot {
            pinned: None,
            non_pinned: vec![slot(1, 2), slot(2, 5), slot(3, 9)],
        };
        apply_normalize(&mut snapshot);
        assert!(check_invariants(&snapshot).is_ok());
        // Second pass finds nothing to change.
        assert!(plan_normalize(&snapshot).is_empty());
    }

    #[test]
    fn normalize_breaks_order_ties_by_creation_time() {
        // Two rows transiently share order 2 mid-transaction; the older row
        // wins the earlier slot.
        let snapshot = OwnerSnapshot {
            pinned: None,
            non_pinned: vec![
                ProjectSlot {
                    id: 7,
                    display_order: 2,
                    created_at: ts(500),
                },
                ProjectSlot {
                    id: 8,
                    display_order: 2,
                    created_at: ts(100),
                },
                slot(1, 1),
            ],
        };
        let plan = plan_normalize(&snapshot);
        assert_eq!(
            plan.changes,
            vec![OrderChange {
                project_id: 7,
                new_order: 3
            }]
        );
    }

    // -----------------------------------------------------------------------
    // check_invariants
    // -----------------------------------------------------------------------

    #[test]
    fn invariants_hold_for_dense_snapshot_with_pin() {
        let snapshot = OwnerSnapshot {
            pinned: Some(9),
            non_pinned: vec![slot(1, 1), slot(2, 2)],
        };
        assert!(check_invariants(&snapshot).is_ok());
    }

    #[test]
    fn invariants_reject_gapped_orders() {
        let snapshot = OwnerSnapshot {
            pinned: None,
            non_pinned: vec![slot(1, 1), slot(2, 3)],
        };
        assert!(check_invariants(&snapshot).is_err());
    }

    #[test]
    fn invariants_reject_duplicate_orders() {
        let snapshot = OwnerSnapshot {
            pinned: None,
            non_pinned: vec![slot(1, 1), slot(2, 1)],
        };
        assert!(check_invariants(&snapshot).is_err());
    }

    #[test]
    fn invariants_reject_pinned_id_in_non_pinned_set() {
        let snapshot = OwnerSnapshot {
            pinned: Some(1),
            non_pinned: vec![slot(1, 1)],
        };
        assert!(check_invariants(&snapshot).is_err());
    }
}
