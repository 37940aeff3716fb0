use std::fmt;

/// One step of a [`Path`]: a row within a table's array.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathStep {
    pub table: String,
    pub index: usize,
}

/// Location of a piece within its mutation, displayed as
/// `users[0].posts[1]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    steps: Vec<PathStep>,
}

impl Path {
    pub(crate) fn root(table: &str, index: usize) -> Path {
        Path::default().child(table, index)
    }

    pub(crate) fn child(&self, table: &str, index: usize) -> Path {
        let mut steps = self.steps.clone();
        steps.push(PathStep {
            table: table.to_string(),
            index,
        });
        Path { steps }
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    pub fn depth(&self) -> usize {
        self.steps.len()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}[{}]", step.table, step.index)?;
        }
        Ok(())
    }
}
