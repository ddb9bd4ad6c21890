use growvec::{GrowVec, Position};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    Push(i32),
    Pop,
    Insert(usize, i32),
    Erase(usize),
    Resize(usize),
    Reserve(usize),
    Clear,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => any::<i32>().prop_map(Op::Push),
        1 => Just(Op::Pop),
        2 => (any::<usize>(), any::<i32>()).prop_map(|(at, x)| Op::Insert(at, x)),
        2 => any::<usize>().prop_map(Op::Erase),
        1 => (0usize..40).prop_map(Op::Resize),
        1 => (0usize..64).prop_map(Op::Reserve),
        1 => Just(Op::Clear),
    ]
}

/// Applies `op` to both vectors. Index arguments are reduced into range.
fn apply(v: &mut GrowVec<i32>, model: &mut Vec<i32>, op: &Op) {
    match *op {
        Op::Push(x) => {
            v.push(x);
            model.push(x);
        }
        Op::Pop => {
            if !model.is_empty() {
                v.pop();
                model.pop();
            }
        }
        Op::Insert(at, x) => {
            let at = at % (model.len() + 1);
            let pos = v.insert(v.position(at), x);
            assert_eq!(pos.index(), at);
            model.insert(at, x);
        }
        Op::Erase(at) => {
            if !model.is_empty() {
                let at = at % model.len();
                v.erase(v.position(at));
                model.remove(at);
            }
        }
        Op::Resize(len) => {
            v.resize(len);
            model.resize(len, 0);
        }
        Op::Reserve(cap) => v.reserve(cap),
        Op::Clear => {
            v.clear();
            model.clear();
        }
    }
}

proptest! {
    #[test]
    fn matches_std_vec(ops in proptest::collection::vec(op(), 0..200)) {
        let mut v = GrowVec::new();
        let mut model = Vec::new();
        for op in &ops {
            apply(&mut v, &mut model, op);
            prop_assert_eq!(v.as_slice(), model.as_slice());
            prop_assert!(v.len() <= v.capacity());
        }
    }

    #[test]
    fn growth_is_max_of_required_and_double(
        start in 0usize..20,
        pushes in 1usize..100,
    ) {
        let mut v = GrowVec::<u8>::with_len(start);
        for _ in 0..pushes {
            let cap = v.capacity();
            let required = v.len() + 1;
            v.push(1);
            if required > cap {
                prop_assert_eq!(v.capacity(), required.max(cap * 2));
            } else {
                prop_assert_eq!(v.capacity(), cap);
            }
        }
    }

    #[test]
    fn reserve_then_pushes_keep_the_buffer(k in 0usize..200, extra in 0usize..200) {
        let mut v = GrowVec::<u32>::new();
        v.reserve(k);
        prop_assert_eq!(v.capacity(), k);

        let ptr = v.as_ptr();
        for x in 0..k.min(extra) {
            v.push(x as u32);
        }
        prop_assert_eq!(v.capacity(), k);
        if k > 0 {
            prop_assert_eq!(v.as_ptr(), ptr);
        }
    }

    #[test]
    fn reserve_never_shrinks(items in proptest::collection::vec(any::<i16>(), 0..50), k in 0usize..50) {
        let mut v: GrowVec<i16> = items.iter().copied().collect();
        let cap = v.capacity();
        v.reserve(k);
        prop_assert_eq!(v.capacity(), cap.max(k));
        prop_assert_eq!(v.as_slice(), items.as_slice());
    }

    #[test]
    fn checked_access_agrees_with_len(
        items in proptest::collection::vec(any::<i32>(), 0..50),
        index in 0usize..60,
    ) {
        let v = GrowVec::from(items.clone());
        match items.get(index) {
            Some(x) => prop_assert_eq!(v.at(index), Ok(x)),
            None => prop_assert!(v.at(index).is_err()),
        }
    }

    #[test]
    fn resize_to_same_len_changes_nothing(items in proptest::collection::vec(any::<i32>(), 0..50)) {
        let mut v = GrowVec::from(items.clone());
        let (cap, ptr) = (v.capacity(), v.as_ptr());
        v.resize(items.len());
        prop_assert_eq!(v.as_slice(), items.as_slice());
        prop_assert_eq!(v.capacity(), cap);
        prop_assert_eq!(v.as_ptr(), ptr);
    }

    #[test]
    fn clone_is_equal_and_independent(items in proptest::collection::vec(any::<i32>(), 1..50)) {
        let original = GrowVec::from(items.clone());
        let mut copy = original.clone();
        prop_assert_eq!(&copy, &original);
        prop_assert_eq!(copy.capacity(), original.capacity());

        copy[0] = copy[0].wrapping_add(1);
        prop_assert_ne!(&copy, &original);
        prop_assert_eq!(original.as_slice(), items.as_slice());
    }

    #[test]
    fn ordering_matches_slices(
        a in proptest::collection::vec(0u8..4, 0..8),
        b in proptest::collection::vec(0u8..4, 0..8),
    ) {
        let (va, vb) = (GrowVec::from(a.clone()), GrowVec::from(b.clone()));
        prop_assert_eq!(va.cmp(&vb), a.cmp(&b));
        prop_assert_eq!(va == vb, a == b);
    }

    #[test]
    fn positions_go_stale_exactly_on_reallocation(pushes in 1usize..40) {
        let mut v = GrowVec::<i32>::with_capacity(4);
        v.push(0);
        let first: Position = v.begin();
        for x in 0..pushes as i32 {
            let cap = v.capacity();
            v.push(x);
            if v.capacity() != cap {
                prop_assert_eq!(v.get_at(first), None);
                return Ok(());
            }
            prop_assert_eq!(v.get_at(first), Some(&0));
        }
    }
}
