use crate::error::RaidError;
use crate::filter::FrameFilter;
use crate::frame::{shiny_class, Frame, Gender, ShinyClass};
use crate::models::{AbilityLock, GenderLock, Raid, ShinyLock};
use crate::xoroshiro::{day_seed, Xoroshiro};

const UNSET_IV: u8 = 255;

fn xor16(v: u32) -> u16 {
    ((v >> 16) as u16) ^ (v as u16)
}

/// レイド個体の生成器
///
/// 消費順はゲーム本体と同一: EC → 仮TID → PID → 色違い解決 →
/// 確定V → 残りV → 特性 → 性別 → 性格。順番を変えると全属性が壊れる。
#[derive(Debug, Clone)]
pub struct RaidGenerator {
    initial_frame: u32,
    max_results: u32,
    tid: u16,
    sid: u16,
    raid: Raid,
}

impl RaidGenerator {
    pub fn new(
        initial_frame: u32,
        max_results: u32,
        tid: u16,
        sid: u16,
        raid: Raid,
    ) -> Result<Self, RaidError> {
        raid.validate()?;
        Ok(Self {
            initial_frame,
            max_results,
            tid,
            sid,
            raid,
        })
    }

    pub fn raid(&self) -> &Raid {
        &self.raid
    }

    /// 基準シードから連続フレームを遅延生成する
    ///
    /// 同じ引数なら何度呼んでも同じ列になる。
    pub fn frames(&self, seed: u64) -> FrameIter<'_> {
        FrameIter {
            generator: self,
            base_seed: seed,
            index: 0,
        }
    }

    /// フィルタを通ったフレームだけを生成順で集める
    pub fn generate(&self, filter: &FrameFilter, seed: u64) -> Vec<Frame> {
        self.frames(seed).filter(|f| filter.matches(f)).collect()
    }

    /// 1フレーム分の個体生成
    pub fn derive(&self, frame: u32, seed: u64) -> Frame {
        let mut rng = Xoroshiro::new(seed);

        let ec = rng.rand(0xFFFF_FFFF) as u32;
        let otid = rng.rand(0xFFFF_FFFF) as u32;
        let mut pid = rng.rand(0xFFFF_FFFF) as u32;

        let shiny = self.resolve_shiny(otid, &mut pid);

        // 確定Vは31固定。埋まるまで位置を引き直す
        let mut ivs = [UNSET_IV; 6];
        let mut fixed = 0;
        while fixed < self.raid.iv_count {
            let stat = rng.rand(6) as usize;
            if ivs[stat] == UNSET_IV {
                ivs[stat] = 31;
                fixed += 1;
            }
        }
        for iv in ivs.iter_mut() {
            if *iv == UNSET_IV {
                *iv = rng.rand(32) as u8;
            }
        }

        let ability = match self.raid.ability {
            AbilityLock::First => 0,
            AbilityLock::Second => 1,
            AbilityLock::Hidden => 2,
            AbilityLock::NoHidden => rng.rand(2) as u8,
            AbilityLock::Any => rng.rand(3) as u8,
        };

        let gender = match self.raid.gender {
            GenderLock::Random => match self.raid.gender_ratio {
                255 => Gender::Genderless,
                254 => Gender::Female,
                0 => Gender::Male,
                ratio => {
                    if (rng.rand(253) as u8) + 1 < ratio {
                        Gender::Female
                    } else {
                        Gender::Male
                    }
                }
            },
            GenderLock::Male => Gender::Male,
            GenderLock::Female => Gender::Female,
            GenderLock::Genderless => Gender::Genderless,
        };

        let nature = rng.rand_nature();

        Frame {
            frame,
            seed,
            ec,
            pid,
            ivs,
            ability,
            gender,
            nature,
            shiny,
        }
    }

    /// 色違い判定とPID補正
    ///
    /// 最終的な判定は必ず shiny_class(pid, tid, sid) と一致する。
    fn resolve_shiny(&self, otid: u32, pid: &mut u32) -> ShinyClass {
        let tid = self.tid;
        let sid = self.sid;
        let real_xor = xor16(*pid) ^ tid ^ sid;

        match self.raid.shiny {
            ShinyLock::Random => {
                let fake_xor = xor16(otid) ^ xor16(*pid);
                if fake_xor < 16 {
                    let class = if fake_xor == 0 {
                        ShinyClass::Square
                    } else {
                        ShinyClass::Star
                    };
                    // 種別が一致していればxor値が違ってもPIDはそのまま
                    if shiny_class(*pid, tid, sid) != class {
                        let target = if class == ShinyClass::Square { 0 } else { 1 };
                        self.rewrite_pid_high(pid, target);
                    }
                    class
                } else {
                    if real_xor < 16 {
                        *pid ^= 0x1000_0000;
                    }
                    ShinyClass::None
                }
            }
            ShinyLock::Always => {
                if real_xor < 16 {
                    if real_xor == 0 {
                        ShinyClass::Square
                    } else {
                        ShinyClass::Star
                    }
                } else {
                    self.rewrite_pid_high(pid, 0);
                    ShinyClass::Square
                }
            }
            ShinyLock::Star => {
                if (1..16).contains(&real_xor) {
                    ShinyClass::Star
                } else {
                    self.rewrite_pid_high(pid, 1);
                    ShinyClass::Star
                }
            }
            ShinyLock::Square => {
                if real_xor == 0 {
                    ShinyClass::Square
                } else {
                    self.rewrite_pid_high(pid, 0);
                    ShinyClass::Square
                }
            }
            ShinyLock::Never => {
                if real_xor < 16 {
                    *pid ^= 0x1000_0000;
                }
                ShinyClass::None
            }
        }
    }

    // PID上位16bitをxor値がtargetになるよう置き換える
    fn rewrite_pid_high(&self, pid: &mut u32, target: u16) {
        let high = (*pid as u16) ^ self.tid ^ self.sid ^ target;
        *pid = ((high as u32) << 16) | (*pid & 0xFFFF);
    }
}

/// 日付送りしながら1日1フレームを返すイテレータ
pub struct FrameIter<'a> {
    generator: &'a RaidGenerator,
    base_seed: u64,
    index: u32,
}

impl Iterator for FrameIter<'_> {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        if self.index >= self.generator.max_results {
            return None;
        }
        // u32上限を越えたらそこで打ち切り
        let frame = self.generator.initial_frame.checked_add(self.index)?;
        self.index += 1;
        Some(self.generator.derive(frame, day_seed(self.base_seed, frame)))
    }
}
