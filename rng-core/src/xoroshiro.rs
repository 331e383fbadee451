// xoroshiro128+ 定数
pub const XOROSHIRO_CONST: u64 = 0x82A2B175229D6A5B;

/// 日付送りによるシード遷移量 (1日 = +XOROSHIRO_CONST)
pub const DAY_ADVANCE: u64 = XOROSHIRO_CONST;

/// 基準シードから day 日後のレイドシードを求める
pub const fn day_seed(base: u64, day: u32) -> u64 {
    base.wrapping_add(DAY_ADVANCE.wrapping_mul(day as u64))
}

// max-1 以上で最小の 2^k - 1
const fn bitmask(max: u64) -> u64 {
    if max <= 1 {
        0
    } else {
        u64::MAX >> (max - 1).leading_zeros()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Xoroshiro {
    pub s0: u64,
    pub s1: u64,
}

impl Xoroshiro {
    /// 64bitシードから内部状態を作る（s1は固定の相方ワード）
    pub const fn new(seed: u64) -> Self {
        Self {
            s0: seed,
            s1: XOROSHIRO_CONST,
        }
    }

    pub fn next(&mut self) -> u64 {
        let s0 = self.s0;
        let mut s1 = self.s1;
        let result = s0.wrapping_add(s1);

        s1 ^= s0;
        self.s0 = s0.rotate_left(24) ^ s1 ^ (s1 << 16);
        self.s1 = s1.rotate_left(37);

        result
    }

    /// [0, max) の乱数をビットマスク棄却法で得る
    ///
    /// max == 0 は消費なしで 0 を返す。
    pub fn rand(&mut self, max: u64) -> u64 {
        if max == 0 {
            return 0;
        }
        let mask = bitmask(max);
        loop {
            let r = self.next() & mask;
            if r < max {
                return r;
            }
        }
    }
}
