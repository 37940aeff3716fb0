use super::Schema;
use crate::{Error, Result};

use std::collections::HashSet;

struct Verify<'a> {
    schema: &'a Schema,
}

impl Schema {
    pub(super) fn verify(&self) -> Result<()> {
        Verify { schema: self }.verify()
    }
}

impl Verify<'_> {
    fn verify(&self) -> Result<()> {
        self.verify_each_table_has_a_primary_key()?;
        self.verify_field_groups_are_well_formed()?;
        self.verify_edges_reference_known_tables()?;
        Ok(())
    }

    fn verify_each_table_has_a_primary_key(&self) -> Result<()> {
        for table in self.schema.tables.values() {
            if table.primary_key.is_empty() {
                return Err(Error::invalid_schema(format!(
                    "table `{}` has no primary key",
                    table.name
                )));
            }
        }

        Ok(())
    }

    fn verify_field_groups_are_well_formed(&self) -> Result<()> {
        for table in self.schema.tables.values() {
            let groups = Some(&table.primary_key)
                .into_iter()
                .chain(table.unique.iter());

            for group in groups {
                if group.is_empty() {
                    return Err(Error::invalid_schema(format!(
                        "table `{}` declares an empty unique group",
                        table.name
                    )));
                }

                let mut seen = HashSet::new();
                for field in group {
                    if !seen.insert(field) {
                        return Err(Error::invalid_schema(format!(
                            "field `{field}` repeated in a key group of `{}`",
                            table.name
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    fn verify_edges_reference_known_tables(&self) -> Result<()> {
        for edge in &self.schema.edges {
            for table in [&edge.from_table, &edge.to_table] {
                if !self.schema.tables.contains_key(table) {
                    return Err(Error::invalid_schema(format!(
                        "edge {edge} references unknown table `{table}`"
                    )));
                }
            }
        }

        Ok(())
    }
}
