//! The seven paired relations and the identity relation between trigrams.
//!
//! Every unordered pair of distinct trigrams belongs to exactly one of the
//! seven named relations. Each relation owns four pairs, and those four
//! pairs touch all eight trigrams exactly once - a perfect matching. Two
//! equal trigrams fall into the identity relation 伏 instead.
//!
//! The tables here are fixed doctrine, not derived data; tests verify the
//! partition and matching properties so the lookup in
//! [`Relation::classify`] can rely on them.

use crate::trigram::Trigram;
use crate::trigram::Trigram::{Dui, Gen, Kan, Kun, Li, Qian, Xun, Zhen};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Compatibility verdict between two trigrams.
///
/// The variants keep the original short labels as opaque tags; use
/// [`Relation::describe`] for the verdict text and [`Relation::severity`]
/// for the coloring class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    /// 延年
    YanNian,
    /// 天乙
    TianYi,
    /// 生氣
    ShengQi,
    /// 六煞
    LiuSha,
    /// 絕命
    JueMing,
    /// 五鬼
    WuGui,
    /// 禍害
    HuoHai,
    /// 伏 - both trigrams are the same
    Fu,
}

/// Coloring class of a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Auspicious,
    Inauspicious,
    Neutral,
}

impl Severity {
    /// Display color used by presentation layers.
    pub fn color(self) -> &'static str {
        match self {
            Severity::Auspicious => "green",
            Severity::Inauspicious => "red",
            Severity::Neutral => "default",
        }
    }
}

/// A named relation and the four trigram pairs that produce it.
#[derive(Debug, Clone, Copy)]
pub struct RelationPairs {
    pub relation: Relation,
    /// Unordered pairs; each trigram appears in exactly one of the four.
    pub pairs: [(Trigram, Trigram); 4],
}

/// The seven substantive relations with their pair sets.
pub const RELATION_TABLE: [RelationPairs; 7] = [
    RelationPairs {
        relation: Relation::YanNian,
        pairs: [(Kan, Li), (Zhen, Xun), (Qian, Kun), (Gen, Dui)],
    },
    RelationPairs {
        relation: Relation::TianYi,
        pairs: [(Kan, Zhen), (Li, Xun), (Qian, Gen), (Kun, Dui)],
    },
    RelationPairs {
        relation: Relation::ShengQi,
        pairs: [(Kan, Xun), (Li, Zhen), (Qian, Dui), (Kun, Gen)],
    },
    RelationPairs {
        relation: Relation::LiuSha,
        pairs: [(Kan, Qian), (Li, Kun), (Zhen, Gen), (Xun, Dui)],
    },
    RelationPairs {
        relation: Relation::JueMing,
        pairs: [(Kan, Kun), (Li, Qian), (Zhen, Dui), (Xun, Gen)],
    },
    RelationPairs {
        relation: Relation::WuGui,
        pairs: [(Kan, Gen), (Li, Dui), (Zhen, Qian), (Xun, Kun)],
    },
    RelationPairs {
        relation: Relation::HuoHai,
        pairs: [(Kan, Dui), (Zhen, Kun), (Li, Gen), (Xun, Qian)],
    },
];

impl Relation {
    pub const ALL: [Relation; 8] = [
        Relation::YanNian,
        Relation::TianYi,
        Relation::ShengQi,
        Relation::LiuSha,
        Relation::JueMing,
        Relation::WuGui,
        Relation::HuoHai,
        Relation::Fu,
    ];

    /// Classify two trigrams. Symmetric in its arguments and total over
    /// the trigram set.
    pub fn classify(a: Trigram, b: Trigram) -> Relation {
        if a == b {
            return Relation::Fu;
        }
        for entry in &RELATION_TABLE {
            for (x, y) in entry.pairs {
                if (x == a && y == b) || (x == b && y == a) {
                    return entry.relation;
                }
            }
        }
        // The seven pair sets partition all 28 distinct pairs.
        unreachable!("relation table does not cover {a}{b}")
    }

    /// Trigram this relation projects the building onto, used to seed the
    /// floor progression. The identity relation has no projection.
    pub fn transform_trigram(self) -> Option<Trigram> {
        match self {
            Relation::YanNian => Some(Qian),
            Relation::TianYi => Some(Gen),
            Relation::ShengQi => Some(Zhen),
            Relation::LiuSha => Some(Kan),
            Relation::JueMing => Some(Dui),
            Relation::WuGui => Some(Li),
            Relation::HuoHai => Some(Kun),
            Relation::Fu => None,
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Relation::YanNian => "延年",
            Relation::TianYi => "天乙",
            Relation::ShengQi => "生氣",
            Relation::LiuSha => "六煞",
            Relation::JueMing => "絕命",
            Relation::WuGui => "五鬼",
            Relation::HuoHai => "禍害",
            Relation::Fu => "伏",
        }
    }

    /// Fixed verdict text for this relation.
    pub fn describe(self) -> &'static str {
        match self {
            Relation::YanNian => "延年門 ( 武曲星 ) : 人丁旺，出聰明人才，出長壽人，發田莊。",
            Relation::TianYi => "天醫門 ( 巨門星 ) : 加官進爵，生財旺相，子孫聰明剛健 。",
            Relation::ShengQi => "生氣門 ( 貪狼星 ) : 人丁旺，出生意人才，住家平安，富貴長久。",
            Relation::LiuSha => "六煞門 ( 文曲星 ) : 初年丁財旺先吉後凶家破人亡，邪淫，災難多破財。",
            Relation::JueMing => "絕命門 ( 破軍星 ) : 不生子女多後絕，官災意外多。",
            Relation::WuGui => "五鬼門 ( 廉貞星 ) : 貧窮，災害，疾病，鬼魅，口舌，血光意外。",
            Relation::HuoHai => {
                "禍害門 ( 祿存星 ) : 人不旺財也不旺，事事不順，子女依賴重，小不順，後絕，不生子。"
            }
            Relation::Fu => "伏位門 ( 輔弼星 ) : 無定位遇吉則吉遇凶則凶，小康之家三代後絕。",
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            Relation::YanNian | Relation::TianYi | Relation::ShengQi => Severity::Auspicious,
            Relation::LiuSha | Relation::JueMing | Relation::WuGui | Relation::HuoHai => {
                Severity::Inauspicious
            }
            Relation::Fu => Severity::Neutral,
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glyph())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn unordered(a: Trigram, b: Trigram) -> (Trigram, Trigram) {
        if a.glyph() <= b.glyph() { (a, b) } else { (b, a) }
    }

    #[test]
    fn test_pairs_partition_all_distinct_pairs() {
        let mut seen = HashSet::new();
        for entry in &RELATION_TABLE {
            for (a, b) in entry.pairs {
                assert_ne!(a, b, "{:?} pairs a trigram with itself", entry.relation);
                assert!(
                    seen.insert(unordered(a, b)),
                    "pair {a}{b} appears in more than one relation"
                );
            }
        }
        assert_eq!(seen.len(), 28);
    }

    #[test]
    fn test_each_relation_is_a_perfect_matching() {
        for entry in &RELATION_TABLE {
            let mut touched = HashSet::new();
            for (a, b) in entry.pairs {
                assert!(touched.insert(a), "{a} repeats in {:?}", entry.relation);
                assert!(touched.insert(b), "{b} repeats in {:?}", entry.relation);
            }
            assert_eq!(touched.len(), 8);
        }
    }

    #[test]
    fn test_classify_is_total_and_substantive_for_distinct_pairs() {
        for a in Trigram::ALL {
            for b in Trigram::ALL {
                if a != b {
                    assert_ne!(Relation::classify(a, b), Relation::Fu);
                }
            }
        }
    }

    #[test]
    fn test_classify_is_symmetric() {
        for a in Trigram::ALL {
            for b in Trigram::ALL {
                assert_eq!(Relation::classify(a, b), Relation::classify(b, a));
            }
        }
    }

    #[test]
    fn test_equal_trigrams_are_fu() {
        for trigram in Trigram::ALL {
            assert_eq!(Relation::classify(trigram, trigram), Relation::Fu);
        }
    }

    #[test]
    fn test_kan_li_is_yannian_seeded_by_qian() {
        let relation = Relation::classify(Kan, Li);
        assert_eq!(relation, Relation::YanNian);
        assert_eq!(relation.transform_trigram(), Some(Qian));
    }

    #[test]
    fn test_substantive_relations_have_distinct_seeds() {
        let seeds: HashSet<_> = RELATION_TABLE
            .iter()
            .map(|entry| entry.relation.transform_trigram().unwrap())
            .collect();
        assert_eq!(seeds.len(), 7);
    }

    #[test]
    fn test_fu_has_no_seed_and_is_neutral() {
        assert_eq!(Relation::Fu.transform_trigram(), None);
        assert_eq!(Relation::Fu.severity(), Severity::Neutral);
        assert_eq!(Relation::Fu.severity().color(), "default");
    }

    #[test]
    fn test_severity_split() {
        let auspicious = [Relation::YanNian, Relation::TianYi, Relation::ShengQi];
        let inauspicious = [
            Relation::LiuSha,
            Relation::JueMing,
            Relation::WuGui,
            Relation::HuoHai,
        ];
        for relation in auspicious {
            assert_eq!(relation.severity(), Severity::Auspicious);
            assert_eq!(relation.severity().color(), "green");
        }
        for relation in inauspicious {
            assert_eq!(relation.severity(), Severity::Inauspicious);
            assert_eq!(relation.severity().color(), "red");
        }
    }

    #[test]
    fn test_every_relation_has_verdict_text() {
        for relation in Relation::ALL {
            assert!(!relation.describe().is_empty());
            assert!(relation.describe().contains('星'));
        }
    }
}
