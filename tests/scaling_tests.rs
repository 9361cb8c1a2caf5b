use elemvec::{ElemVec, GROWTH_FACTOR, MIN_CAPACITY, SHRINK_DIVISOR};

fn expected_capacity(len: usize) -> usize {
    (len + 1).next_power_of_two().max(MIN_CAPACITY)
}

#[test]
fn test_policy_constants() {
    assert_eq!(MIN_CAPACITY, 4);
    assert_eq!(GROWTH_FACTOR, 2);
    assert_eq!(SHRINK_DIVISOR, 4);
}

#[test]
fn test_scaling() {
    let mut v = ElemVec::<u32>::new().unwrap();
    assert_eq!(v.len(), 0);
    assert_eq!(v.capacity(), MIN_CAPACITY);

    for i in 0..MIN_CAPACITY as u32 {
        v.push_back(i).unwrap();
    }
    assert_eq!(v.len(), MIN_CAPACITY);
    assert_eq!(v.capacity(), MIN_CAPACITY * GROWTH_FACTOR);

    for _ in 0..MIN_CAPACITY {
        v.pop_back().unwrap();
    }
    assert_eq!(v.len(), 0);
    assert_eq!(v.capacity(), MIN_CAPACITY);
}

#[test]
fn test_capacity_doubles_exactly_when_full() {
    let mut v = ElemVec::<u8>::new().unwrap();
    for n in 1..=300usize {
        let before = v.capacity();
        v.push_back((n % 256) as u8).unwrap();
        assert_eq!(v.len(), n);
        assert_eq!(v.capacity(), expected_capacity(n), "after {n} pushes");
        if n == before {
            assert_eq!(v.capacity(), before * 2);
        } else {
            assert_eq!(v.capacity(), before);
        }
    }
}

#[test]
fn test_shrink_below_quarter() {
    let mut v = ElemVec::<u64>::new().unwrap();
    for i in 0..32 {
        v.push_back(i).unwrap();
    }
    assert_eq!(v.capacity(), 64);

    let mut trace = Vec::new();
    while !v.is_empty() {
        v.pop_back().unwrap();
        trace.push((v.len(), v.capacity()));
    }

    for &(len, capacity) in &trace {
        assert!(capacity >= MIN_CAPACITY);
        assert!(len <= capacity);
    }
    // 15 < 64 / 4 is the first shrink
    assert_eq!(trace[15], (16, 64));
    assert_eq!(trace[16], (15, 32));
    assert_eq!(trace.last(), Some(&(0, 4)));
}

#[test]
fn test_capacity_never_below_floor() {
    let mut v = ElemVec::<i8>::new().unwrap();
    v.push_back(1).unwrap();
    v.pop_back().unwrap();
    assert_eq!(v.capacity(), MIN_CAPACITY);
    v.reset();
    assert_eq!(v.capacity(), MIN_CAPACITY);
}

#[test]
fn test_reset_after_large_growth() {
    let mut v = ElemVec::<u32>::new().unwrap();
    for i in 0..1000 {
        v.push_back(i).unwrap();
    }
    assert_eq!(v.capacity(), 1024);

    v.reset();
    assert_eq!(v.len(), 0);
    assert_eq!(v.capacity(), MIN_CAPACITY);
}
