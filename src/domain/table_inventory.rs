use std::collections::BTreeMap;

use serde::Serialize;

// Seating capacity of a restaurant: seat-count -> number of tables of that
// size. Stored as a JSON object string, e.g. {"2": 4, "4": 3}.
//
// Physical tables are not persisted. Each read derives the same synthetic
// table list from this inventory, so every part of the system that talks
// about "table 3" means the same table, as long as it goes through
// synthetic_tables().
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableInventory(BTreeMap<i32, i32>);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SyntheticTable{
    pub table_id: i32,
    pub size: i32
}

impl TableInventory {
    pub fn parse(json: &str) -> Result<TableInventory, String>{
        let raw: BTreeMap<String, i32> = serde_json::from_str(json)
            .map_err(|_| "tables is not a valid JSON object of size -> count".to_string())?;

        let mut groups = BTreeMap::new();
        for (size, count) in raw {
            let size: i32 = size
                .parse()
                .map_err(|_| format!("{} is not a valid table size", size))?;

            if size <= 0 {
                return Err(format!("table size {} must be positive", size))
            }
            if count <= 0 {
                return Err(format!("table count {} must be positive", count))
            }

            groups.insert(size, count);
        }

        Ok(TableInventory(groups))
    }

    pub fn from_groups(groups: BTreeMap<i32, i32>) -> TableInventory{
        TableInventory(groups)
    }

    pub fn to_json(&self) -> String{
        // keys serialized back as strings, mirroring the stored form
        let raw: BTreeMap<String, i32> = self.0
            .iter()
            .map(|(size, count)| (size.to_string(), *count))
            .collect();

        serde_json::to_string(&raw).expect("Failed to serialize table inventory")
    }

    pub fn total_tables(&self) -> i32{
        self.0.values().sum()
    }

    // Table identity is positional: walk size groups in ascending seat-size
    // order and hand out sequential ids starting at 1. The same inventory
    // always yields the same list.
    pub fn synthetic_tables(&self) -> Vec<SyntheticTable>{
        let mut tables = Vec::new();
        let mut next_id = 1;

        for (size, count) in self.0.iter() {
            for _ in 0..*count {
                tables.push(SyntheticTable{table_id: next_id, size: *size});
                next_id += 1;
            }
        }

        tables
    }
}
