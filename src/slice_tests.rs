use super::*;
use crate::raw::{fail_alloc_after, fail_next_alloc};
use crate::{ErrorKind, MAX_INDEX, MIN_INDEX};
use std::rc::Rc;

fn arr(min: i64, values: &[i32]) -> FlexArray<i32> {
    FlexArray::from_vec(min, values.to_vec()).unwrap()
}

fn five() -> FlexArray<i32> {
    arr(1, &[10, 20, 30, 40, 50])
}

fn bounds<T>(a: &FlexArray<T>) -> (i64, i64) {
    (a.min_index(), a.max_index())
}

// -- head -------------------------------------------------------------------

#[test]
fn head_prefix() {
    let h = five().head(3).unwrap();
    assert_eq!(bounds(&h), (1, 3));
    assert_eq!(h.as_slice(), [10, 20, 30]);
}

#[test]
fn head_clamps_stop() {
    let h = five().head(100).unwrap();
    assert_eq!(h, five());
    let h = five().head(MAX_INDEX).unwrap();
    assert_eq!(h, five());
}

#[test]
fn head_empty_edges() {
    let h = five().head(0).unwrap();
    assert_eq!(bounds(&h), (1, 0));

    let e = FlexArray::<i32>::empty(5).unwrap();
    let h = e.head(4).unwrap();
    assert_eq!(bounds(&h), (5, 4));
    let h = e.head(100).unwrap();
    assert!(h.is_empty());
    let err = e.head(3).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Index);
}

#[test]
fn head_below_pred_min() {
    let err = five().head(-1).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Index);
    assert_eq!(err.operation, "head");
}

#[test]
fn head_at_min_index() {
    let a = FlexArray::from_vec(MIN_INDEX, vec![1, 2, 3]).unwrap();
    let h = a.head(MIN_INDEX).unwrap();
    assert_eq!(h.as_slice(), [1]);
    // stop == MIN_INDEX - 1 is not representable, so no empty head exists.
    assert_eq!(a.head(MIN_INDEX + 5).unwrap().len(), 3);
}

#[test]
fn head_temp_splits() {
    let mut slot = Some(five());
    let h = FlexArray::head_temp(&mut slot, 2).unwrap();
    assert_eq!(bounds(&h), (1, 2));
    assert_eq!(h.as_slice(), [10, 20]);
    let rest = slot.unwrap();
    assert_eq!(bounds(&rest), (3, 5));
    assert_eq!(rest.as_slice(), [30, 40, 50]);
}

#[test]
fn head_temp_whole_takes_slot() {
    let mut slot = Some(five());
    let h = FlexArray::head_temp(&mut slot, 5).unwrap();
    assert_eq!(h, five());
    assert!(slot.is_none());
}

#[test]
fn head_temp_empty_leaves_slot() {
    let mut slot = Some(five());
    let h = FlexArray::head_temp(&mut slot, 0).unwrap();
    assert_eq!(bounds(&h), (1, 0));
    assert_eq!(slot, Some(five()));

    let err = FlexArray::head_temp(&mut slot, -5).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Index);
    assert_eq!(slot, Some(five()));
}

#[test]
fn head_temp_shrink_failure_restores() {
    let rc = Rc::new(());
    let source = FlexArray::times(1, 6, rc.clone()).unwrap();
    let mut slot = Some(source);
    fail_alloc_after(1);
    let err = FlexArray::head_temp(&mut slot, 2).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Memory);
    assert_eq!(bounds(slot.as_ref().unwrap()), (1, 6));
    assert_eq!(Rc::strong_count(&rc), 7);
    drop(slot);
    assert_eq!(Rc::strong_count(&rc), 1);
}

#[test]
fn head_temp_copy_failure_leaves_slot() {
    let mut slot = Some(five());
    fail_next_alloc();
    assert!(FlexArray::head_temp(&mut slot, 2).is_err());
    assert_eq!(slot, Some(five()));
}

// -- tail -------------------------------------------------------------------

#[test]
fn tail_keeps_positions() {
    let t = five().tail(3).unwrap();
    assert_eq!(bounds(&t), (3, 5));
    assert_eq!(t.as_slice(), [30, 40, 50]);
}

#[test]
fn tail_from_min_is_whole() {
    assert_eq!(five().tail(1).unwrap(), five());
}

#[test]
fn tail_past_end_is_empty_at_min() {
    let t = five().tail(6).unwrap();
    assert_eq!(bounds(&t), (1, 0));
    let t = five().tail(MAX_INDEX).unwrap();
    assert!(t.is_empty());
}

#[test]
fn tail_before_min_is_index_error() {
    let err = five().tail(0).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Index);
}

#[test]
fn tail_temp_splits() {
    let mut slot = Some(five());
    let t = FlexArray::tail_temp(&mut slot, 4).unwrap();
    assert_eq!(bounds(&t), (4, 5));
    assert_eq!(t.as_slice(), [40, 50]);
    let rest = slot.unwrap();
    assert_eq!(bounds(&rest), (1, 3));
    assert_eq!(rest.as_slice(), [10, 20, 30]);
}

#[test]
fn tail_temp_whole_and_empty() {
    let mut slot = Some(five());
    let t = FlexArray::tail_temp(&mut slot, 9).unwrap();
    assert!(t.is_empty());
    assert_eq!(slot, Some(five()));

    let t = FlexArray::tail_temp(&mut slot, 1).unwrap();
    assert_eq!(t, five());
    assert!(slot.is_none());
}

#[test]
fn tail_temp_shrink_failure_restores() {
    let mut slot = Some(five());
    fail_alloc_after(1);
    let err = FlexArray::tail_temp(&mut slot, 3).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Memory);
    assert_eq!(slot, Some(five()));
}

// -- range ------------------------------------------------------------------

#[test]
fn range_reanchors_at_min() {
    let r = five().range(2, 4).unwrap();
    assert_eq!(bounds(&r), (1, 3));
    assert_eq!(r.as_slice(), [20, 30, 40]);
}

#[test]
fn range_clamps_and_empties() {
    assert_eq!(five().range(4, 99).unwrap().as_slice(), [40, 50]);
    let r = five().range(3, 2).unwrap();
    assert_eq!(bounds(&r), (1, 0));
    let r = five().range(6, 10).unwrap();
    assert_eq!(bounds(&r), (1, 0));
}

#[test]
fn range_checks_stop_after_clamping() {
    for (start, stop) in [(7, 10), (10, 20), (7, MAX_INDEX)] {
        let err = five().range(start, stop).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Index, "range({start}, {stop})");
        assert_eq!(err.reason, "stop is less than start - 1");
    }

    let mut slot = Some(five());
    let err = FlexArray::range_temp(&mut slot, 10, 20).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Index);
    assert_eq!(err.operation, "range_temp");
    assert_eq!(slot, Some(five()));

    let e = FlexArray::<i32>::empty(5).unwrap();
    assert!(e.range(5, 100).unwrap().is_empty());
    assert_eq!(e.range(6, 100).unwrap_err().kind, ErrorKind::Index);
}

#[test]
fn range_errors() {
    assert_eq!(five().range(0, 3).unwrap_err().kind, ErrorKind::Index);
    let err = five().range(3, 1).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Index);
    assert_eq!(err.reason, "stop is less than start - 1");
}

#[test]
fn range_temp_closes_gap() {
    let mut slot = Some(five());
    let r = FlexArray::range_temp(&mut slot, 2, 3).unwrap();
    assert_eq!(bounds(&r), (1, 2));
    assert_eq!(r.as_slice(), [20, 30]);
    let rest = slot.unwrap();
    assert_eq!(bounds(&rest), (1, 3));
    assert_eq!(rest.as_slice(), [10, 40, 50]);
}

#[test]
fn range_temp_whole_takes_slot() {
    let mut slot = Some(five());
    let r = FlexArray::range_temp(&mut slot, 1, 50).unwrap();
    assert_eq!(r, five());
    assert!(slot.is_none());
}

#[test]
fn range_temp_shrink_failure_restores() {
    let values: Vec<String> = (0..8).map(|i| format!("v{i}")).collect();
    let original = FlexArray::from_vec(-2, values).unwrap();
    let mut slot = Some(original.clone());
    fail_alloc_after(1);
    let err = FlexArray::range_temp(&mut slot, 0, 2).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Memory);
    assert_eq!(slot, Some(original));
}

// -- subarr -----------------------------------------------------------------

#[test]
fn subarr_counts_from_start() {
    let s = five().subarr(2, 3).unwrap();
    assert_eq!(bounds(&s), (1, 3));
    assert_eq!(s.as_slice(), [20, 30, 40]);
}

#[test]
fn subarr_clamps_length() {
    assert_eq!(five().subarr(4, 10).unwrap().as_slice(), [40, 50]);
    assert_eq!(five().subarr(1, i64::MAX).unwrap(), five());
}

#[test]
fn subarr_empty_results() {
    assert!(five().subarr(2, 0).unwrap().is_empty());
    assert!(five().subarr(6, 2).unwrap().is_empty());
    let e = FlexArray::<i32>::empty(-3).unwrap();
    assert_eq!(bounds(&e.subarr(-3, 4).unwrap()), (-3, -4));
}

#[test]
fn subarr_errors() {
    assert_eq!(five().subarr(0, 1).unwrap_err().kind, ErrorKind::Index);
    assert_eq!(five().subarr(2, -1).unwrap_err().kind, ErrorKind::Index);
}

#[test]
fn subarr_temp_moves_run() {
    let mut slot = Some(five());
    let s = FlexArray::subarr_temp(&mut slot, 4, 7).unwrap();
    assert_eq!(s.as_slice(), [40, 50]);
    assert_eq!(bounds(&s), (1, 2));
    assert_eq!(slot.unwrap().as_slice(), [10, 20, 30]);

    let mut slot = Some(five());
    let s = FlexArray::subarr_temp(&mut slot, 1, 5).unwrap();
    assert_eq!(s, five());
    assert!(slot.is_none());
}

#[test]
fn subarr_temp_errors_leave_slot() {
    let mut slot = Some(five());
    assert!(FlexArray::subarr_temp(&mut slot, 2, -3).is_err());
    assert!(FlexArray::subarr_temp(&mut slot, -2, 3).is_err());
    assert_eq!(slot, Some(five()));
}

// -- Round trip -------------------------------------------------------------

#[test]
fn head_and_tail_rebuild_array() {
    let a = arr(-5, &[1, 2, 3, 4, 5, 6, 7]);
    for k in a.min_index() - 1..=a.max_index() {
        let h = a.head(k).unwrap();
        let t = a.tail(k + 1).unwrap();
        let joined = h.concat(t).unwrap();
        assert_eq!(joined, a, "split at {k}");
    }
}

#[test]
fn head_temp_pieces_rebuild_array() {
    let a = arr(3, &[1, 2, 3, 4, 5, 6]);
    for k in a.min_index()..a.max_index() {
        let mut slot = Some(a.clone());
        let h = FlexArray::head_temp(&mut slot, k).unwrap();
        let rest = slot.take().unwrap();
        assert_eq!(rest.min_index(), k + 1);
        assert_eq!(h.concat(rest).unwrap(), a);
    }
}
