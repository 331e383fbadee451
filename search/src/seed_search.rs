use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use std::thread;

use thiserror::Error;
use tracing::{debug, info};

use rng_core::error::RaidError;
use rng_core::generator::RaidGenerator;
use rng_core::models::Raid;
use rng_core::xoroshiro::day_seed;

use crate::model::PartialFrame;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error(transparent)]
    Raid(#[from] RaidError),

    /// 観測値が1件もない（全候補が一致してしまう）
    #[error("no usable observation was supplied")]
    EmptyObservations,

    #[error("seed range is empty")]
    EmptyRange,
}

/// 探索対象のシード範囲 [start, start+len)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedRange {
    pub start: u64,
    pub len: u64,
}

impl SeedRange {
    /// 観測値では32bitまでしか絞れないため、実用上の全探索範囲
    pub const BIT32: SeedRange = SeedRange {
        start: 0,
        len: 1 << 32,
    };

    // ワーカー数ぶんの連続区画に割る。端数は先頭側に寄せる
    fn split(&self, parts: u64) -> Vec<SeedRange> {
        let chunk = self.len / parts;
        let remainder = self.len % parts;
        let mut ranges = Vec::new();
        let mut start = self.start;
        for i in 0..parts {
            let len = chunk + u64::from(i < remainder);
            if len == 0 {
                continue;
            }
            ranges.push(SeedRange { start, len });
            start = start.wrapping_add(len);
        }
        ranges
    }
}

/// 探索の終わり方
///
/// 「走査し切って0件」と「途中打ち切り」は別物として返す。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// 全範囲を走査し終えた。複数残ったら観測値不足のサイン
    Exhausted { seeds: Vec<u64> },
    /// 最初の一致で停止した
    FirstMatch { seeds: Vec<u64> },
    /// キャンセルされた。収集済みの一致はそのまま有効
    Cancelled { seeds: Vec<u64> },
}

impl SearchOutcome {
    pub fn seeds(&self) -> &[u64] {
        match self {
            SearchOutcome::Exhausted { seeds }
            | SearchOutcome::FirstMatch { seeds }
            | SearchOutcome::Cancelled { seeds } => seeds,
        }
    }
}

/// 協調キャンセルと進捗の共有ハンドル
#[derive(Debug, Default)]
pub struct SearchHandle {
    cancel: AtomicBool,
    progress: AtomicU64,
}

impl SearchHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    /// 検査済み候補数
    pub fn progress(&self) -> u64 {
        self.progress.load(Ordering::Relaxed)
    }
}

/// 観測値から基準シードを逆算する全探索エンジン
///
/// 範囲をワーカー数で静的分割し、各候補ごとに観測日のフレームを
/// 再生成して突き合わせる。結果は順序に依存しない集合。
pub struct SeedSearcher {
    generator: RaidGenerator,
    threads: usize,
    first_match: bool,
}

impl SeedSearcher {
    pub fn new(raid: Raid, tid: u16, sid: u16, threads: usize) -> Result<Self, SearchError> {
        let generator = RaidGenerator::new(0, 1, tid, sid, raid)?;
        Ok(Self {
            generator,
            threads: threads.max(1),
            first_match: false,
        })
    }

    /// 最初の一致で打ち切るモード
    pub fn first_match(mut self, enabled: bool) -> Self {
        self.first_match = enabled;
        self
    }

    pub fn search(
        &self,
        range: SeedRange,
        observations: &[PartialFrame],
        handle: &SearchHandle,
    ) -> Result<SearchOutcome, SearchError> {
        if observations.is_empty() || observations.iter().all(PartialFrame::is_empty) {
            return Err(SearchError::EmptyObservations);
        }
        if range.len == 0 {
            return Err(SearchError::EmptyRange);
        }

        let matches = Mutex::new(Vec::new());
        let found = AtomicBool::new(false);

        let parts = range.split(self.threads as u64);
        info!(
            start = format_args!("{:016X}", range.start),
            len = range.len,
            workers = parts.len(),
            "seed search start"
        );

        thread::scope(|scope| {
            for part in &parts {
                let matches = &matches;
                let found = &found;
                scope.spawn(move || {
                    self.scan(*part, observations, handle, found, matches);
                });
            }
        });

        let mut seeds = matches.into_inner().unwrap_or_else(|e| e.into_inner());
        // ワーカー数によらず同じ集合を返す
        seeds.sort_unstable();
        seeds.dedup();

        let outcome = if handle.is_cancelled() {
            SearchOutcome::Cancelled { seeds }
        } else if self.first_match && found.load(Ordering::Relaxed) {
            SearchOutcome::FirstMatch { seeds }
        } else {
            SearchOutcome::Exhausted { seeds }
        };
        info!(matches = outcome.seeds().len(), "seed search done");
        Ok(outcome)
    }

    // 1区画ぶんの走査。候補ごとにキャンセルを確認する
    fn scan(
        &self,
        part: SeedRange,
        observations: &[PartialFrame],
        handle: &SearchHandle,
        found: &AtomicBool,
        matches: &Mutex<Vec<u64>>,
    ) {
        debug!(
            start = format_args!("{:016X}", part.start),
            len = part.len,
            "worker start"
        );
        for i in 0..part.len {
            if handle.is_cancelled() {
                return;
            }
            if self.first_match && found.load(Ordering::Relaxed) {
                return;
            }

            let seed = part.start.wrapping_add(i);
            let hit = observations.iter().all(|observation| {
                let frame = self
                    .generator
                    .derive(observation.day, day_seed(seed, observation.day));
                observation.matches(&frame)
            });
            if hit {
                info!(seed = format_args!("{seed:016X}"), "candidate found");
                match matches.lock() {
                    Ok(mut seeds) => seeds.push(seed),
                    Err(mut poisoned) => poisoned.get_mut().push(seed),
                }
                found.store(true, Ordering::Relaxed);
            }
            handle.progress.fetch_add(1, Ordering::Relaxed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rng_core::models::{AbilityLock, GenderLock, ShinyLock};

    const SEED: u64 = 0x1122334455667788;

    fn raid() -> Raid {
        Raid {
            species: 837,
            alt_form: 0,
            iv_count: 3,
            ability: AbilityLock::Any,
            gender: GenderLock::Random,
            gender_ratio: 127,
            shiny: ShinyLock::Random,
            gigantamax: false,
        }
    }

    fn observations_from(seed: u64, days: &[u32]) -> Vec<PartialFrame> {
        let generator = RaidGenerator::new(0, 1, 12345, 54321, raid()).unwrap();
        days.iter()
            .map(|&day| PartialFrame::from_frame(day, &generator.derive(day, day_seed(seed, day))))
            .collect()
    }

    #[test]
    fn test_round_trip_finds_seed() {
        let observations = observations_from(SEED, &[0, 1]);
        let searcher = SeedSearcher::new(raid(), 12345, 54321, 4).unwrap();
        let range = SeedRange {
            start: SEED - 0x400,
            len: 0x800,
        };
        let outcome = searcher
            .search(range, &observations, &SearchHandle::new())
            .unwrap();
        match outcome {
            SearchOutcome::Exhausted { seeds } => assert!(seeds.contains(&SEED)),
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn test_worker_count_invariance() {
        // 観測を弱くして複数候補が残るようにする
        let mut observation = PartialFrame::default();
        observation.nature = observations_from(SEED, &[0])[0].nature;
        observation.ivs[0] = Some(31);
        let range = SeedRange {
            start: SEED - 0x800,
            len: 0x1000,
        };

        let mut results = Vec::new();
        for threads in [1, 2, 3, 8] {
            let searcher = SeedSearcher::new(raid(), 12345, 54321, threads).unwrap();
            let outcome = searcher
                .search(range, std::slice::from_ref(&observation), &SearchHandle::new())
                .unwrap();
            results.push(outcome);
        }
        assert!(results.windows(2).all(|pair| pair[0] == pair[1]));
    }

    #[test]
    fn test_exhausted_without_match() {
        let observations = observations_from(SEED, &[0, 1]);
        let searcher = SeedSearcher::new(raid(), 12345, 54321, 2).unwrap();
        // 正しいシードを含まない範囲
        let range = SeedRange {
            start: SEED + 0x1000,
            len: 0x400,
        };
        let outcome = searcher
            .search(range, &observations, &SearchHandle::new())
            .unwrap();
        assert_eq!(outcome, SearchOutcome::Exhausted { seeds: vec![] });
    }

    #[test]
    fn test_cancellation_is_cooperative() {
        let observations = observations_from(SEED, &[0]);
        let searcher = SeedSearcher::new(raid(), 12345, 54321, 2).unwrap();
        let handle = SearchHandle::new();
        handle.cancel();
        let outcome = searcher
            .search(SeedRange { start: 0, len: 0x10000 }, &observations, &handle)
            .unwrap();
        assert_eq!(outcome, SearchOutcome::Cancelled { seeds: vec![] });
        assert_eq!(handle.progress(), 0);
    }

    #[test]
    fn test_cancel_keeps_collected_matches() {
        // 正解を先頭付近に置き、回収を確認してから打ち切る
        let observations = observations_from(SEED, &[0]);
        let searcher = SeedSearcher::new(raid(), 12345, 54321, 1).unwrap();
        let handle = SearchHandle::new();
        let range = SeedRange {
            start: SEED - 4,
            len: 0x4000000,
        };
        let outcome = thread::scope(|scope| {
            let worker = scope.spawn(|| searcher.search(range, &observations, &handle));
            while handle.progress() < 5 {
                thread::yield_now();
            }
            handle.cancel();
            worker.join().unwrap()
        })
        .unwrap();
        match outcome {
            SearchOutcome::Cancelled { seeds } => assert!(seeds.contains(&SEED)),
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn test_first_match_stops_early() {
        // ゆるい観測値なら一致が多数あるので最初の1件で止まる
        let mut observation = PartialFrame::default();
        observation.ivs[0] = observations_from(SEED, &[0])[0].ivs[0];
        let searcher = SeedSearcher::new(raid(), 12345, 54321, 1)
            .unwrap()
            .first_match(true);
        let handle = SearchHandle::new();
        let range = SeedRange {
            start: SEED - 0x100,
            len: 0x1000,
        };
        let outcome = searcher
            .search(range, std::slice::from_ref(&observation), &handle)
            .unwrap();
        match outcome {
            SearchOutcome::FirstMatch { seeds } => assert_eq!(seeds.len(), 1),
            other => panic!("unexpected outcome {other:?}"),
        }
        assert!(handle.progress() < range.len);
    }

    #[test]
    fn test_rejects_bad_input() {
        let searcher = SeedSearcher::new(raid(), 1, 2, 1).unwrap();
        let handle = SearchHandle::new();
        assert_eq!(
            searcher.search(SeedRange { start: 0, len: 10 }, &[], &handle),
            Err(SearchError::EmptyObservations)
        );
        assert_eq!(
            searcher.search(
                SeedRange { start: 0, len: 10 },
                &[PartialFrame::default()],
                &handle
            ),
            Err(SearchError::EmptyObservations)
        );
        let observations = observations_from(SEED, &[0]);
        assert_eq!(
            searcher.search(SeedRange { start: 0, len: 0 }, &observations, &handle),
            Err(SearchError::EmptyRange)
        );

        let mut bad = raid();
        bad.iv_count = 9;
        assert_eq!(
            SeedSearcher::new(bad, 1, 2, 1).err(),
            Some(SearchError::Raid(RaidError::InvalidIvCount(9)))
        );
    }

    #[test]
    fn test_split_covers_range_exactly() {
        let range = SeedRange { start: 100, len: 10 };
        for parts in 1..=12u64 {
            let split = range.split(parts);
            let total: u64 = split.iter().map(|r| r.len).sum();
            assert_eq!(total, 10);
            let mut expected = 100;
            for part in &split {
                assert_eq!(part.start, expected);
                expected += part.len;
            }
        }
    }
}
