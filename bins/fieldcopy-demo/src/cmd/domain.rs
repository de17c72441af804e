use std::fmt;

use fieldcopy::Record;

/// Input record: every field arrives as text.
#[derive(Debug, Clone, Default, Record)]
pub struct Source {
    pub id: String,
    pub name: String,
    pub age: String,
}

impl Source {
    pub fn new(id: impl Into<String>, name: impl Into<String>, age: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            age: age.into(),
        }
    }
}

/// Output record: `age` is numeric and unset until copied.
#[derive(Debug, Clone, Default, PartialEq, Record)]
pub struct Target {
    pub id: String,
    pub name: String,
    pub age: Option<i32>,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let age = self.age.map(|a| a.to_string()).unwrap_or_else(|| "null".into());
        write!(f, "Target(id={}, name={}, age={age})", self.id, self.name)
    }
}

/// `count` sample sources: ids `0..count`, names `{prefix}{i}`, ages `{age_base}{i}`.
pub fn sample_sources(count: usize, name_prefix: &str, age_base: &str) -> Vec<Source> {
    (0..count)
        .map(|i| Source::new(i.to_string(), format!("{name_prefix}{i}"), format!("{age_base}{i}")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_sources() {
        let sources = sample_sources(5, "name", "11");
        assert_eq!(sources.len(), 5);
        assert_eq!(sources[4].id, "4");
        assert_eq!(sources[4].name, "name4");
        assert_eq!(sources[4].age, "114");
    }

    #[test]
    fn test_target_display() {
        let target = Target {
            id: "1".into(),
            name: "name".into(),
            age: Some(22),
        };
        assert_eq!(target.to_string(), "Target(id=1, name=name, age=22)");
        assert_eq!(Target::default().to_string(), "Target(id=, name=, age=null)");
    }
}
