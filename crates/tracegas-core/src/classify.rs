use crate::constants::{AMBIENT_TAG, TANK_SERIALS};
use crate::record::CorrectedRecord;
use rustc_hash::FxHashMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SampleClass {
    Ambient,
    /// Calibration / standard tank, by serial.
    Tank(String),
}

impl fmt::Display for SampleClass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SampleClass::Ambient => write!(f, "ambient air"),
            SampleClass::Tank(serial) => write!(f, "tank {serial}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TagRule {
    pub pattern: String,
    pub class: SampleClass,
}

/// Ordered substring rules; the first rule whose pattern occurs in the tag wins.
#[derive(Debug, Clone)]
pub struct TagClassifier {
    rules: Vec<TagRule>,
}

impl Default for TagClassifier {
    fn default() -> Self {
        let mut rules = vec![TagRule { pattern: AMBIENT_TAG.to_owned(), class: SampleClass::Ambient }];
        rules.extend(TANK_SERIALS.iter().map(|s| TagRule {
            pattern: (*s).to_owned(),
            class: SampleClass::Tank((*s).to_owned()),
        }));
        Self { rules }
    }
}

impl TagClassifier {
    pub fn classify(&self, tag: &str) -> Option<SampleClass> {
        self.rules.iter().find(|r| tag.contains(r.pattern.as_str())).map(|r| r.class.clone())
    }

    pub fn partition(&self, records: Vec<CorrectedRecord>) -> Partitions {
        let mut parts = Partitions::default();
        for rec in records {
            match self.classify(&rec.tag) {
                Some(SampleClass::Ambient) => parts.ambient.push(rec),
                Some(SampleClass::Tank(serial)) => parts.tanks.entry(serial).or_default().push(rec),
                None => {
                    log::debug!("Dropping record at {} with unknown tag '{}'", rec.timestamp, rec.tag);
                    parts.dropped += 1;
                },
            }
        }
        parts
    }
}

#[derive(Debug, Default, Clone)]
pub struct Partitions {
    pub ambient: Vec<CorrectedRecord>,
    pub tanks: FxHashMap<String, Vec<CorrectedRecord>>,
    pub dropped: usize,
}

impl Partitions {
    /// Tank serials in sorted order.
    pub fn tank_serials(&self) -> Vec<&str> {
        let mut serials: Vec<&str> = self.tanks.keys().map(String::as_str).collect();
        serials.sort_unstable();
        serials
    }
    pub fn tank_count(&self) -> usize {
        self.tanks.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rec(tag: &str) -> CorrectedRecord {
        CorrectedRecord {
            timestamp: NaiveDate::from_ymd_opt(2019, 5, 1).unwrap().and_hms_opt(0, 0, 0).unwrap(),
            tag: tag.to_owned(),
            conc: 2000.,
            conc_stdev: 1.,
            delta: -47.,
            delta_stdev: 0.1,
        }
    }

    #[test]
    fn classifies_known_tags() {
        let c = TagClassifier::default();
        assert_eq!(c.classify("air_ambient"), Some(SampleClass::Ambient));
        assert_eq!(c.classify("D671527-std"), Some(SampleClass::Tank("D671527".to_owned())));
        assert_eq!(c.classify("D334213"), Some(SampleClass::Tank("D334213".to_owned())));
        assert_eq!(c.classify("unknown-X"), None);
    }

    #[test]
    fn first_match_wins() {
        let c = TagClassifier::default();
        // contains both the ambient literal and a tank serial
        assert_eq!(c.classify("air-D671528"), Some(SampleClass::Ambient));
        assert_eq!(c.classify("D671528/D671527"), Some(SampleClass::Tank("D671527".to_owned())));
    }

    #[test]
    fn partitions_are_disjoint() {
        let c = TagClassifier::default();
        let records =
            vec![rec("air"), rec("D671527-std"), rec("unknown-X"), rec("air"), rec("D334212")];
        let parts = c.partition(records);
        assert_eq!(parts.ambient.len(), 2);
        assert_eq!(parts.tank_count(), 2);
        assert_eq!(parts.dropped, 1);
        assert_eq!(parts.tank_serials(), vec!["D334212", "D671527"]);
    }
}
