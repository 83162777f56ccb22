//! 生成属性随机化
//!
//! 可随机化的属性是一个封闭枚举，启用集合用定长数组表示，
//! 成员判断为 O(1)。

use rand::Rng;
use serde::{Deserialize, Serialize};

/// 可随机化的生成属性
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RandomAttribute {
    Position,
    Speed,
    TotalLife,
}

impl RandomAttribute {
    pub const COUNT: usize = 3;
    pub const ALL: [RandomAttribute; Self::COUNT] = [
        RandomAttribute::Position,
        RandomAttribute::Speed,
        RandomAttribute::TotalLife,
    ];

    fn index(self) -> usize {
        match self {
            RandomAttribute::Position => 0,
            RandomAttribute::Speed => 1,
            RandomAttribute::TotalLife => 2,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RandomAttribute::Position => "Position",
            RandomAttribute::Speed => "Speed",
            RandomAttribute::TotalLife => "Total life",
        }
    }
}

/// 已启用随机化的属性集合
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RandomAttributes {
    enabled: [bool; RandomAttribute::COUNT],
}

impl RandomAttributes {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Self {
            enabled: [true; RandomAttribute::COUNT],
        }
    }

    pub fn contains(&self, attribute: RandomAttribute) -> bool {
        self.enabled[attribute.index()]
    }

    pub fn insert(&mut self, attribute: RandomAttribute) {
        self.enabled[attribute.index()] = true;
    }

    pub fn remove(&mut self, attribute: RandomAttribute) {
        self.enabled[attribute.index()] = false;
    }

    pub fn set(&mut self, attribute: RandomAttribute, enabled: bool) {
        self.enabled[attribute.index()] = enabled;
    }

    pub fn is_empty(&self) -> bool {
        self.enabled.iter().all(|e| !e)
    }

    pub fn iter(&self) -> impl Iterator<Item = RandomAttribute> + '_ {
        RandomAttribute::ALL
            .into_iter()
            .filter(move |attr| self.contains(*attr))
    }
}

impl FromIterator<RandomAttribute> for RandomAttributes {
    fn from_iter<I: IntoIterator<Item = RandomAttribute>>(iter: I) -> Self {
        let mut set = Self::empty();
        for attr in iter {
            set.insert(attr);
        }
        set
    }
}

// 配置文件中以属性列表形式出现
impl Serialize for RandomAttributes {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for RandomAttributes {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let list = Vec::<RandomAttribute>::deserialize(deserializer)?;
        Ok(list.into_iter().collect())
    }
}

/// 均匀分布区间 [min, max)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RandomRange {
    pub min: f32,
    pub max: f32,
}

impl RandomRange {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn is_valid(&self) -> bool {
        self.min.is_finite()
            && self.max.is_finite()
            && self.min <= self.max
            && self.span().is_finite()
    }

    fn span(&self) -> f32 {
        self.max - self.min
    }

    /// 采样；退化区间或宽度溢出的区间返回 `min`
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if self.max > self.min && self.span().is_finite() {
            rng.gen_range(self.min..self.max)
        } else {
            self.min
        }
    }
}

/// 各属性的随机区间
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomRanges {
    pub position_x: RandomRange,
    pub position_y: RandomRange,
    pub speed_x: RandomRange,
    pub speed_y: RandomRange,
    pub life: RandomRange,
}

impl Default for RandomRanges {
    fn default() -> Self {
        Self {
            position_x: RandomRange::new(0.0, 1280.0),
            position_y: RandomRange::new(0.0, 720.0),
            speed_x: RandomRange::new(-1.0, 1.0),
            speed_y: RandomRange::new(-1.0, 1.0),
            life: RandomRange::new(1.0, 5.0),
        }
    }
}

impl RandomRanges {
    /// 返回第一个非法区间的名称
    pub fn invalid_range(&self) -> Option<&'static str> {
        [
            ("position_x", &self.position_x),
            ("position_y", &self.position_y),
            ("speed_x", &self.speed_x),
            ("speed_y", &self.speed_y),
            ("life", &self.life),
        ]
        .into_iter()
        .find(|(_, range)| !range.is_valid())
        .map(|(name, _)| name)
    }
}

/// 随机化配置：启用集合 + 区间
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomizationConfig {
    pub enabled: RandomAttributes,
    pub ranges: RandomRanges,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_attribute_set_membership() {
        let mut set = RandomAttributes::empty();
        assert!(set.is_empty());

        set.insert(RandomAttribute::Speed);
        assert!(set.contains(RandomAttribute::Speed));
        assert!(!set.contains(RandomAttribute::Position));

        set.set(RandomAttribute::Position, true);
        set.set(RandomAttribute::Speed, false);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![RandomAttribute::Position]);

        set.remove(RandomAttribute::Position);
        assert!(set.is_empty());
    }

    #[test]
    fn test_range_sample() {
        let mut rng = StdRng::seed_from_u64(42);
        let range = RandomRange::new(2.0, 3.0);
        for _ in 0..50 {
            let v = range.sample(&mut rng);
            assert!((2.0..3.0).contains(&v));
        }
        assert_eq!(RandomRange::new(4.0, 4.0).sample(&mut rng), 4.0);
    }

    #[test]
    fn test_invalid_range_detected() {
        let mut ranges = RandomRanges::default();
        assert_eq!(ranges.invalid_range(), None);
        ranges.speed_y = RandomRange::new(1.0, -1.0);
        assert_eq!(ranges.invalid_range(), Some("speed_y"));

        ranges.speed_y = RandomRange::new(-1.0, 1.0);
        ranges.speed_x = RandomRange::new(-3e38, 3e38);
        assert_eq!(ranges.invalid_range(), Some("speed_x"));
    }

    #[test]
    fn test_overflowing_range_samples_min() {
        let mut rng = StdRng::seed_from_u64(9);
        let range = RandomRange::new(-3e38, 3e38);
        assert!(!range.is_valid());
        assert_eq!(range.sample(&mut rng), -3e38);
    }

    #[test]
    fn test_attribute_set_serde() {
        let set: RandomAttributes = [RandomAttribute::TotalLife, RandomAttribute::Position]
            .into_iter()
            .collect();
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["Position","TotalLife"]"#);
        let parsed: RandomAttributes = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, set);
    }
}
