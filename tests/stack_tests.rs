use elemvec::{ElemVec, ElemVecError};

#[test]
fn test_initialization() {
    let v = ElemVec::<i32>::new().unwrap();

    assert_eq!(v.len(), 0);
    assert!(v.is_empty());
    assert_eq!(v.capacity(), 4);
    assert_eq!(v.element_size(), 4);
}

#[test]
fn test_simple_push_backs() {
    let mut v = ElemVec::<i32>::new().unwrap();

    assert!(v.push_back(1).is_ok());
    assert_eq!(v.len(), 1);
    assert!(v.push_back(1).is_ok());
    assert_eq!(v.len(), 2);
}

#[test]
fn test_pop_empty_vector() {
    let mut v = ElemVec::<i32>::new().unwrap();
    assert_eq!(v.pop_back(), Err(ElemVecError::Empty));
    assert_eq!(v.len(), 0);
}

#[test]
fn test_peek_empty_vector() {
    let v = ElemVec::<i32>::new().unwrap();
    assert_eq!(v.peek_back(), Err(ElemVecError::Empty));
}

#[test]
fn test_simple_pop_backs() {
    let mut v = ElemVec::<i32>::new().unwrap();

    v.push_back(1).unwrap();
    v.push_back(2).unwrap();
    assert_eq!(v.len(), 2);

    assert_eq!(v.pop_back(), Ok(2));
    assert_eq!(v.len(), 1);

    assert_eq!(v.pop_back(), Ok(1));
    assert_eq!(v.len(), 0);

    assert_eq!(v.pop_back(), Err(ElemVecError::Empty));
}

#[test]
fn test_push_then_pop_is_noop_on_count() {
    let mut v = ElemVec::<u64>::new().unwrap();
    for i in 0..7 {
        v.push_back(i).unwrap();
    }

    v.push_back(1234).unwrap();
    assert_eq!(v.pop_back(), Ok(1234));
    assert_eq!(v.len(), 7);
    assert_eq!(v.peek_back(), Ok(&6));
}

#[test]
fn test_peek_does_not_remove() {
    let mut v = ElemVec::<char>::new().unwrap();
    v.push_back('a').unwrap();
    v.push_back('b').unwrap();

    assert_eq!(v.peek_back(), Ok(&'b'));
    assert_eq!(v.peek_back(), Ok(&'b'));
    assert_eq!(v.len(), 2);
}

#[test]
fn test_different_sizes() {
    let mut longs = ElemVec::<i64>::new().unwrap();
    longs.push_back(1).unwrap();
    longs.push_back(2).unwrap();
    assert_eq!(longs.len(), 2);
    assert_eq!(longs.pop_back(), Ok(2));
    assert_eq!(longs.pop_back(), Ok(1));
    assert_eq!(longs.len(), 0);

    let mut chars = ElemVec::<u8>::new().unwrap();
    chars.push_back(1).unwrap();
    chars.push_back(2).unwrap();
    assert_eq!(chars.element_size(), 1);
    assert_eq!(chars.pop_back(), Ok(2));
    assert_eq!(chars.pop_back(), Ok(1));
    assert!(chars.is_empty());

    let mut shorts = ElemVec::<i16>::new().unwrap();
    shorts.push_back(1).unwrap();
    shorts.push_back(2).unwrap();
    assert_eq!(shorts.element_size(), 2);
    assert_eq!(shorts.pop_back(), Ok(2));
    assert_eq!(shorts.pop_back(), Ok(1));
    assert!(shorts.is_empty());
}

#[test]
fn test_wide_elements() {
    let mut v = ElemVec::<[u8; 100]>::new().unwrap();
    for i in 0..10u8 {
        v.push_back([i; 100]).unwrap();
    }
    assert_eq!(v.element_size(), 100);
    assert_eq!(v.pop_back().unwrap(), [9; 100]);
    assert_eq!(v.get_copy_at(4).unwrap(), [4; 100]);
}

#[test]
fn test_reset() {
    let mut v = ElemVec::<i32>::new().unwrap();
    for i in 0..4 {
        v.push_back(i + 1).unwrap();
    }
    assert_eq!(v.len(), 4);

    v.reset();

    assert_eq!(v.len(), 0);
    assert_eq!(v.capacity(), 4);
    assert_eq!(v.pop_back(), Err(ElemVecError::Empty));

    v.push_back(42).unwrap();
    assert_eq!(v.get_copy_at(0), Ok(42));
}
