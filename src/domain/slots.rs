use chrono::NaiveTime;

// Bookable times are advertised on a fixed half-hour grid from 10:00 to
// 23:30, matching what the booking cards render.
pub fn slot_grid() -> Vec<NaiveTime>{
    (0..28)
        .map(|i| {
            NaiveTime::from_hms_opt(10 + i / 2, (i % 2) * 30, 0)
                .expect("slot grid times are always valid")
        })
        .collect()
}

// The requested time plus up to two slots on either side. Times off the
// grid snap to the nearest grid position first.
pub fn surrounding_slots(requested: NaiveTime) -> Vec<NaiveTime>{
    let grid = slot_grid();

    let nearest = grid
        .iter()
        .enumerate()
        .min_by_key(|(_, slot)| (**slot - requested).num_minutes().abs())
        .map(|(idx, _)| idx)
        .expect("slot grid is never empty");

    let from = nearest.saturating_sub(2);
    let to = usize::min(nearest + 3, grid.len());

    grid[from..to].to_vec()
}
