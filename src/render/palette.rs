use indexmap::IndexMap;

const FALLBACK: &str = "#999999";

/// Colour assignment for task types, cycling through the configured
/// palette in order of first appearance.
#[derive(Debug, Clone, Default)]
pub struct Palette {
    assigned: IndexMap<String, String>,
}

impl Palette {
    pub fn new<I, S>(types: I, colors: &[String]) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut assigned = IndexMap::new();
        for task_type in types {
            let task_type = task_type.into();
            if assigned.contains_key(&task_type) {
                continue;
            }
            let color = if colors.is_empty() {
                FALLBACK.to_string()
            } else {
                colors[assigned.len() % colors.len()].clone()
            };
            assigned.insert(task_type, color);
        }
        Self { assigned }
    }

    pub fn color(&self, task_type: &str) -> &str {
        self.assigned
            .get(task_type)
            .map(String::as_str)
            .unwrap_or(FALLBACK)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.assigned.iter().map(|(t, c)| (t.as_str(), c.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_cycles_and_dedups() {
        let colors = vec!["#111".to_string(), "#222".to_string()];
        let palette = Palette::new(["http", "sql", "http", "notify"], &colors);

        assert_eq!(palette.color("http"), "#111");
        assert_eq!(palette.color("sql"), "#222");
        assert_eq!(palette.color("notify"), "#111");
        assert_eq!(palette.color("unknown"), FALLBACK);
        assert_eq!(palette.entries().count(), 3);
    }
}
