/// Level plans: text art for a level, loaded from a file or built in.
///
/// ## File format (`.txt`):
///   Line 1 (optional): `# Level Name`
///   Lines: map rows
///
/// ## Legend:
///   'x' = Wall     '!' = Lava      ' ' = Space
///   '@' = Player   '$' = Coin
///   '-' = Lava moving left/right   '|' = Lava moving up/down
///
/// Trailing empty lines are dropped. A row of spaces is terrain and is
/// kept. Short rows are padded with spaces to the widest row. Symbols are validated by `Level::from_plan`.

use std::path::Path;

use crate::error::LevelError;

const DEFAULT_NAME: &str = "Untitled";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelPlan {
    pub name: String,
    pub rows: Vec<String>,
}

impl LevelPlan {
    pub fn new(name: impl Into<String>, rows: Vec<String>) -> Self {
        LevelPlan { name: name.into(), rows }
    }

    /// Rows taken as-is (no padding), unnamed.
    pub fn from_rows(rows: &[&str]) -> Self {
        LevelPlan::new(DEFAULT_NAME, rows.iter().map(|r| r.to_string()).collect())
    }

    pub fn parse(content: &str) -> Result<Self, LevelError> {
        let mut lines = content.lines().peekable();

        let name = match lines.peek() {
            Some(first) if first.starts_with('#') => {
                let name = first[1..].trim().to_string();
                lines.next();
                name
            }
            _ => String::new(),
        };

        let mut rows: Vec<String> = lines.map(str::to_string).collect();
        while rows.last().is_some_and(|r| r.is_empty()) {
            rows.pop();
        }
        if rows.is_empty() {
            return Err(LevelError::EmptyPlan);
        }

        let max_width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        for row in &mut rows {
            let len = row.chars().count();
            if len < max_width {
                row.extend(std::iter::repeat(' ').take(max_width - len));
            }
        }

        let name = if name.is_empty() { DEFAULT_NAME.to_string() } else { name };
        Ok(LevelPlan { name, rows })
    }

    pub fn load(path: &Path) -> Result<Self, LevelError> {
        let content = std::fs::read_to_string(path).map_err(|source| LevelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let plan = LevelPlan::parse(&content)?;
        log::info!("loaded plan {:?} from {}", plan.name, path.display());
        Ok(plan)
    }

    /// The demo level.
    pub fn builtin() -> Self {
        LevelPlan::new(
            "Dark Blue",
            DARK_BLUE.iter().map(|r| r.to_string()).collect(),
        )
    }
}

const DARK_BLUE: [&str; 9] = [
    "                       ",
    "                       ",
    " x $ x            - x  ",
    "             $ $    x  ",
    "     @      xxxxx   x  ",
    " xxxxxxx            x  ",
    " xxxxxxx!!!!!!!!!!!!x  ",
    " xxxxxxxxxxxxxxxxxxxx  ",
    "                       ",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_reads_name_and_rows() {
        let plan = LevelPlan::parse("# First Steps\nx@x\nxxx\n").unwrap();
        assert_eq!(plan.name, "First Steps");
        assert_eq!(plan.rows, vec!["x@x", "xxx"]);
    }

    #[test]
    fn parse_without_header_is_untitled() {
        let plan = LevelPlan::parse(" @ \nxxx").unwrap();
        assert_eq!(plan.name, "Untitled");
        assert_eq!(plan.rows.len(), 2);
    }

    #[test]
    fn parse_pads_short_rows_and_drops_trailing_empty_lines() {
        let plan = LevelPlan::parse("# Pad\n@\nxxx\n\n\n").unwrap();
        assert_eq!(plan.rows, vec!["@  ", "xxx"]);
    }

    #[test]
    fn parse_keeps_a_final_row_of_spaces() {
        let plan = LevelPlan::parse("# Open floor\n@  \nxxx\n   \n").unwrap();
        assert_eq!(plan.rows, vec!["@  ", "xxx", "   "]);
    }

    #[test]
    fn reparsed_builtin_keeps_its_height() {
        let builtin = LevelPlan::builtin();
        let text = format!("# {}\n{}\n", builtin.name, builtin.rows.join("\n"));
        assert_eq!(LevelPlan::parse(&text).unwrap(), builtin);
    }

    #[test]
    fn parse_rejects_empty_plan() {
        assert!(matches!(LevelPlan::parse(""), Err(LevelError::EmptyPlan)));
        assert!(matches!(LevelPlan::parse("# Only a name\n\n"), Err(LevelError::EmptyPlan)));
    }

    #[test]
    fn load_reports_missing_file() {
        let path = Path::new("/nonexistent/lavarunner/plan.txt");
        match LevelPlan::load(path) {
            Err(LevelError::Io { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn load_reads_file_from_disk() {
        let path = std::env::temp_dir().join(format!("lavarunner-plan-{}.txt", std::process::id()));
        std::fs::write(&path, "# Disk\n @$\nxxx\n").unwrap();
        let plan = LevelPlan::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(plan.name, "Disk");
        assert_eq!(plan.rows, vec![" @$", "xxx"]);
    }

    #[test]
    fn builtin_is_rectangular_with_one_player() {
        let plan = LevelPlan::builtin();
        assert_eq!(plan.name, "Dark Blue");
        let width = plan.rows[0].len();
        assert!(plan.rows.iter().all(|r| r.len() == width));
        let players: usize = plan.rows.iter().map(|r| r.matches('@').count()).sum();
        assert_eq!(players, 1);
        let coins: usize = plan.rows.iter().map(|r| r.matches('$').count()).sum();
        assert_eq!(coins, 3);
    }
}
