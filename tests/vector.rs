// Integration tests for Vector: Python-style indexing, slicing and the
// retirement rules for its cursors.
//
// Invariants exercised
// - Indices in [-n, n) address the same element as their normalized form;
//   anything else is IndexOutOfRange and leaves the vector untouched.
// - Structural mutations invalidate every outstanding cursor; in-place
//   writes (`set`, `Cursor::set_value`) and `reserve` do not.
// - Failed mutations and empty-slice no-ops do not invalidate.
// - Iterating yields clones until the end, or one InvalidatedHandle if
//   the vector changes shape mid-way.

use epoch_collections::{Error, Slice, Vector};

fn vector(values: &[i32]) -> Vector<i32> {
    values.iter().copied().collect()
}

// Test: negative indices count from the end.
// Assumes: a three element vector.
// Verifies: get/set accept [-3, 3) and reject everything else.
#[test]
fn negative_indices_address_from_the_end() {
    let mut v = vector(&[10, 20, 30]);
    assert_eq!(v.get(-1), Ok(30));
    assert_eq!(v.get(-3), Ok(10));
    assert_eq!(v.get(3), Err(Error::IndexOutOfRange { index: 3, len: 3 }));
    assert_eq!(
        v.get(-4),
        Err(Error::IndexOutOfRange { index: -4, len: 3 })
    );
    v.set(-2, 21).unwrap();
    assert_eq!(v.to_state(), vec![10, 21, 30]);
}

// Test: index errors carry readable messages.
// Assumes: messages mirror Python's wording.
// Verifies: an empty vector reports emptiness, a populated one reports
// the valid range.
#[test]
fn index_error_messages() {
    let empty: Vector<i32> = Vector::new();
    assert_eq!(
        empty.get(0).unwrap_err().to_string(),
        "Sequence is empty."
    );
    let v = vector(&[1, 2]);
    assert_eq!(
        v.get(5).unwrap_err().to_string(),
        "Index should be in range(-2, 2), but found 5."
    );
}

// Test: set keeps cursors alive while structural edits kill them.
// Assumes: begin() issues a mutable forward cursor.
// Verifies: set -> still valid; insert -> invalidated.
#[test]
fn set_keeps_cursors_and_insert_retires() {
    let mut v = vector(&[1, 2, 3]);
    let c = v.begin();
    v.set(0, 100).unwrap();
    assert_eq!(c.value(), Ok(100));
    v.insert(1, 5);
    assert_eq!(c.value(), Err(Error::InvalidatedHandle));
    assert_eq!(v.to_state(), vec![100, 5, 2, 3]);
}

// Test: insert clamps like list.insert.
// Assumes: out-of-range indices go to the nearest end.
// Verifies: -100 prepends, 100 appends, -1 inserts before the last.
#[test]
fn insert_clamps_to_either_end() {
    let mut v = vector(&[1, 2]);
    v.insert(-100, 0);
    v.insert(100, 3);
    v.insert(-1, 9);
    assert_eq!(v.to_state(), vec![0, 1, 2, 9, 3]);
}

// Test: pop/remove/index_of/count behave like their list counterparts.
#[test]
fn list_style_removals_and_searches() {
    let mut v = vector(&[4, 5, 4, 6]);
    assert_eq!(v.count(&4), 2);
    assert_eq!(v.index_of(&6), Ok(3));
    assert_eq!(v.index_of(&7), Err(Error::ValueNotFound));
    v.remove(&4).unwrap();
    assert_eq!(v.to_state(), vec![5, 4, 6]);
    assert_eq!(v.pop(-1), Ok(6));
    assert_eq!(v.pop_back(), Ok(4));
    v.delete(0).unwrap();
    assert!(v.is_empty());
    assert_eq!(
        v.pop_back(),
        Err(Error::EmptyCollection {
            container: "Vector"
        })
    );
    assert_eq!(v.remove(&1), Err(Error::ValueNotFound));
}

// Test: failed mutations do not retire the epoch.
// Assumes: a cursor taken before the failures.
// Verifies: the cursor still reads after every failed call.
#[test]
fn failed_mutations_leave_cursors_valid() {
    let mut v = vector(&[1, 2, 3]);
    let c = v.cbegin();
    assert!(v.pop(7).is_err());
    assert!(v.delete(-9).is_err());
    assert!(v.remove(&42).is_err());
    assert!(v.set_slice(Slice::full().with_step(2), vec![0]).is_err());
    assert!(v.delete_slice(Slice::full().with_step(0)).is_err());
    v.extend(Vec::new());
    v.delete_slice(2..2).unwrap();
    assert_eq!(c.value(), Ok(1));
}

// Test: reading slices.
// Assumes: Python slice semantics, including negative steps.
// Verifies: a handful of representative slices.
#[test]
fn get_slice_follows_python_semantics() {
    let v = vector(&[0, 1, 2, 3, 4, 5]);
    assert_eq!(v.get_slice(1..4).unwrap().to_state(), vec![1, 2, 3]);
    assert_eq!(v.get_slice(-2..).unwrap().to_state(), vec![4, 5]);
    assert_eq!(v.get_slice(..-4).unwrap().to_state(), vec![0, 1]);
    assert_eq!(
        v.get_slice(Slice::full().with_step(-2)).unwrap().to_state(),
        vec![5, 3, 1]
    );
    assert_eq!(
        v.get_slice(Slice::new(Some(4), Some(1), Some(-1)))
            .unwrap()
            .to_state(),
        vec![4, 3, 2]
    );
    assert!(v.get_slice(4..1).unwrap().is_empty());
    assert_eq!(
        v.get_slice(Slice::full().with_step(0)).unwrap_err(),
        Error::ZeroStepSlice
    );
}

// Test: the most extreme steps are valid.
// Assumes: any nonzero step resolves; a step wider than the vector
// addresses only the first element in its direction.
// Verifies: isize::MIN and isize::MAX read, assign and delete one element.
#[test]
fn extreme_steps_address_a_single_element() {
    let v = vector(&[1, 2, 3]);
    assert_eq!(
        v.get_slice(Slice::full().with_step(isize::MIN))
            .unwrap()
            .to_state(),
        vec![3]
    );
    assert_eq!(
        v.get_slice(Slice::full().with_step(isize::MAX))
            .unwrap()
            .to_state(),
        vec![1]
    );
    let mut v = vector(&[1, 2, 3]);
    v.set_slice(Slice::full().with_step(isize::MIN), vec![30])
        .unwrap();
    v.delete_slice(Slice::full().with_step(isize::MAX)).unwrap();
    assert_eq!(v.to_state(), vec![2, 30]);
}

// Test: contiguous slice assignment may change the length.
// Verifies: grow, shrink and pure insertion at an empty slice.
#[test]
fn contiguous_assignment_resizes() {
    let mut v = vector(&[0, 1, 2, 3]);
    v.set_slice(1..3, vec![7, 8, 9]).unwrap();
    assert_eq!(v.to_state(), vec![0, 7, 8, 9, 3]);
    v.set_slice(0..4, vec![5]).unwrap();
    assert_eq!(v.to_state(), vec![5, 3]);
    v.set_slice(1..1, vec![4]).unwrap();
    assert_eq!(v.to_state(), vec![5, 4, 3]);
}

// Test: extended slice assignment needs an exact count.
// Verifies: the mismatch error names both counts and nothing changes.
#[test]
fn extended_assignment_requires_matching_length() {
    let mut v = vector(&[0, 1, 2, 3, 4]);
    assert_eq!(
        v.set_slice(Slice::full().with_step(2), vec![9, 9]),
        Err(Error::SliceLengthMismatch {
            expected: 3,
            actual: 2
        })
    );
    assert_eq!(v.to_state(), vec![0, 1, 2, 3, 4]);
    v.set_slice(Slice::full().with_step(2), vec![7, 8, 9])
        .unwrap();
    assert_eq!(v.to_state(), vec![7, 1, 8, 3, 9]);
}

// Test: deleting extended slices.
// Verifies: every addressed element is removed, order preserved.
#[test]
fn delete_extended_slice() {
    let mut v = vector(&[0, 1, 2, 3, 4, 5, 6]);
    v.delete_slice(Slice::full().with_step(-3)).unwrap();
    assert_eq!(v.to_state(), vec![1, 2, 4, 5]);
}

// Test: reserve grows capacity without invalidating.
#[test]
fn reserve_keeps_cursors() {
    let mut v = vector(&[1]);
    let c = v.begin();
    v.reserve(64);
    assert!(v.capacity() >= 64);
    assert_eq!(c.value(), Ok(1));
    v.reserve(0);
    assert!(v.capacity() >= 64);
}

// Test: resize pads or truncates.
#[test]
fn resize_pads_and_truncates() {
    let mut v = vector(&[1, 2, 3]);
    v.resize(5, 0);
    assert_eq!(v.to_state(), vec![1, 2, 3, 0, 0]);
    v.resize(1, 0);
    assert_eq!(v.to_state(), vec![1]);
}

// Test: clones are independent.
// Verifies: mutating the clone leaves the original and its cursors alone.
#[test]
fn clone_is_deep() {
    let mut a = vector(&[1, 2]);
    let c = a.cbegin();
    let mut b = a.clone();
    b.push_back(3);
    b.set(0, 9).unwrap();
    assert_eq!(a.to_state(), vec![1, 2]);
    assert_eq!(c.value(), Ok(1));
    assert_eq!(b.to_state(), vec![9, 2, 3]);
}

// Test: comparisons are lexicographic.
#[test]
fn lexicographic_ordering() {
    assert!(vector(&[1, 2]) < vector(&[1, 3]));
    assert!(vector(&[1, 2]) < vector(&[1, 2, 0]));
    assert!(vector(&[]) < vector(&[0]));
    assert_eq!(vector(&[4, 5]), vector(&[4, 5]));
}

// Test: Debug output.
#[test]
fn debug_format() {
    assert_eq!(format!("{:?}", vector(&[1, 2, 3])), "Vector(1, 2, 3)");
    assert_eq!(format!("{:?}", Vector::<i32>::new()), "Vector()");
    let strings: Vector<&str> = vec!["a"].into();
    assert_eq!(format!("{strings:?}"), r#"Vector("a")"#);
}

// Test: iteration through `for` and `collect`.
// Verifies: forward and reverse order, and that a push between steps is
// reported instead of yielding stale elements.
#[test]
fn iteration_reports_mutation_mid_way() {
    let mut v = vector(&[1, 2, 3]);
    let mut sum = 0;
    for x in &v {
        sum += x.unwrap();
    }
    assert_eq!(sum, 6);
    assert_eq!(v.iter_rev().collect::<Result<Vec<_>, _>>(), Ok(vec![3, 2, 1]));

    let mut it = v.iter();
    assert_eq!(it.next(), Some(Ok(1)));
    v.push_back(4);
    assert_eq!(it.next(), Some(Err(Error::InvalidatedHandle)));
    assert_eq!(it.next(), None);

    // In-place writes are seen by a running iteration.
    let mut it = v.iter();
    assert_eq!(it.next(), Some(Ok(1)));
    v.set(1, 20).unwrap();
    assert_eq!(it.collect::<Result<Vec<_>, _>>(), Ok(vec![20, 3, 4]));
}
