use rand::Rng;

/// 不放回抽样：每次在剩余池中均匀选取一个下标并移除，保证同一轮内不重复。
///
/// `count` 大于池大小时只返回池中全部元素（顺序随机）。
pub fn sample_without_replacement<T, R>(mut pool: Vec<T>, count: usize, rng: &mut R) -> Vec<T>
where
    R: Rng + ?Sized,
{
    let count = count.min(pool.len());
    let mut picked = Vec::with_capacity(count);
    for _ in 0..count {
        let index = rng.gen_range(0..pool.len());
        picked.push(pool.remove(index));
    }
    picked
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    #[test]
    fn test_sample_has_no_duplicates() {
        let mut rng = StdRng::seed_from_u64(7);
        let pool: Vec<i64> = (1..=50).collect();
        let picked = sample_without_replacement(pool, 20, &mut rng);
        assert_eq!(picked.len(), 20);
        let unique: HashSet<_> = picked.iter().collect();
        assert_eq!(unique.len(), 20);
        assert!(picked.iter().all(|id| (1..=50).contains(id)));
    }

    #[test]
    fn test_sample_caps_at_pool_size() {
        let mut rng = StdRng::seed_from_u64(1);
        let picked = sample_without_replacement(vec!["a", "b", "c"], 10, &mut rng);
        assert_eq!(picked.len(), 3);
        let unique: HashSet<_> = picked.into_iter().collect();
        assert_eq!(unique, HashSet::from(["a", "b", "c"]));
    }

    #[test]
    fn test_sample_zero_and_empty() {
        let mut rng = StdRng::seed_from_u64(3);
        assert!(sample_without_replacement(vec![1, 2, 3], 0, &mut rng).is_empty());
        assert!(sample_without_replacement(Vec::<i32>::new(), 5, &mut rng).is_empty());
    }

    #[test]
    fn test_sample_covers_every_member_over_many_rounds() {
        // 均匀抽样：足够多轮后每个成员都应至少被抽中一次
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = HashSet::new();
        for _ in 0..200 {
            seen.extend(sample_without_replacement((0..10).collect::<Vec<_>>(), 1, &mut rng));
        }
        assert_eq!(seen.len(), 10);
    }
}
