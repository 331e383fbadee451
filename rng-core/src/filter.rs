use crate::frame::{Frame, Gender, ShinyClass};
use crate::models::Nature;

/// 色違いの許容条件
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShinyFilter {
    #[default]
    Any,
    Star,
    Square,
    /// 星型・菱形のどちらでも
    Either,
}

/// フレームの合否判定
///
/// 全条件のANDで、未指定の項目は常に通す。
#[derive(Debug, Clone)]
pub struct FrameFilter {
    pub gender: Option<Gender>,
    pub ability: Option<u8>,
    pub shiny: ShinyFilter,
    pub min: [u8; 6],
    pub max: [u8; 6],
    pub natures: [bool; 25],
    /// trueなら全フレームを通す
    pub skip: bool,
}

impl Default for FrameFilter {
    fn default() -> Self {
        Self {
            gender: None,
            ability: None,
            shiny: ShinyFilter::Any,
            min: [0; 6],
            max: [31; 6],
            natures: [true; 25],
            skip: false,
        }
    }
}

impl FrameFilter {
    pub fn allow_nature(&mut self, nature: Nature, allow: bool) {
        self.natures[nature.id() as usize] = allow;
    }

    pub fn matches(&self, frame: &Frame) -> bool {
        if self.skip {
            return true;
        }

        if let Some(gender) = self.gender {
            if frame.gender != gender {
                return false;
            }
        }

        if let Some(ability) = self.ability {
            if frame.ability != ability {
                return false;
            }
        }

        let shiny_ok = match self.shiny {
            ShinyFilter::Any => true,
            ShinyFilter::Star => frame.shiny == ShinyClass::Star,
            ShinyFilter::Square => frame.shiny == ShinyClass::Square,
            ShinyFilter::Either => frame.shiny != ShinyClass::None,
        };
        if !shiny_ok {
            return false;
        }

        for i in 0..6 {
            if frame.ivs[i] < self.min[i] || frame.ivs[i] > self.max[i] {
                return false;
            }
        }

        self.natures[frame.nature.id() as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> Frame {
        Frame {
            frame: 0,
            seed: 0x1122334455667788,
            ec: 0x7803E1E3,
            pid: 0x5C97D74F,
            ivs: [31, 16, 0, 12, 31, 31],
            ability: 2,
            gender: Gender::Female,
            nature: Nature::new(20),
            shiny: ShinyClass::None,
        }
    }

    #[test]
    fn test_default_passes() {
        assert!(FrameFilter::default().matches(&frame()));
    }

    #[test]
    fn test_skip_overrides_everything() {
        let mut filter = FrameFilter::default();
        filter.min = [31; 6];
        filter.skip = true;
        assert!(filter.matches(&frame()));
    }

    #[test]
    fn test_iv_bounds() {
        let mut filter = FrameFilter::default();
        filter.min[0] = 31;
        assert!(filter.matches(&frame()));
        filter.min[2] = 1;
        assert!(!filter.matches(&frame()));
        filter.min[2] = 0;
        filter.max[1] = 15;
        assert!(!filter.matches(&frame()));
    }

    #[test]
    fn test_gender_ability_nature() {
        let mut filter = FrameFilter::default();
        filter.gender = Some(Gender::Male);
        assert!(!filter.matches(&frame()));

        let mut filter = FrameFilter::default();
        filter.ability = Some(2);
        assert!(filter.matches(&frame()));
        filter.ability = Some(0);
        assert!(!filter.matches(&frame()));

        let mut filter = FrameFilter::default();
        filter.allow_nature(Nature::new(20), false);
        assert!(!filter.matches(&frame()));
    }

    #[test]
    fn test_shiny_filter() {
        let mut filter = FrameFilter::default();
        filter.shiny = ShinyFilter::Either;
        assert!(!filter.matches(&frame()));

        let mut shiny = frame();
        shiny.shiny = ShinyClass::Square;
        assert!(filter.matches(&shiny));
        filter.shiny = ShinyFilter::Star;
        assert!(!filter.matches(&shiny));
        filter.shiny = ShinyFilter::Square;
        assert!(filter.matches(&shiny));
    }

    #[test]
    fn test_filter_is_idempotent() {
        let mut filter = FrameFilter::default();
        filter.min[0] = 20;
        let frames = vec![frame(), frame()];
        let once: Vec<Frame> = frames.iter().filter(|f| filter.matches(f)).cloned().collect();
        let twice: Vec<Frame> = once.iter().filter(|f| filter.matches(f)).cloned().collect();
        assert_eq!(once, twice);
    }
}
