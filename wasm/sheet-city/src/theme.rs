// Auto-generated palette values.
//
// Source of truth: `palette.json` at the crate root.
//
// Rust constants are generated at compile-time by `wasm/sheet-city/build.rs`.
mod palette_gen {
    include!(concat!(env!("OUT_DIR"), "/palette_gen.rs"));
}

pub type Rgb = [u8; 3];
pub type Rgba = [u8; 4];

fn rgb((r, g, b): (u8, u8, u8)) -> Rgb {
    [r, g, b]
}

pub fn with_alpha(color: Rgb, alpha: u8) -> Rgba {
    [color[0], color[1], color[2], alpha]
}

pub fn palette_len() -> usize {
    palette_gen::CONNECTION.len()
}

/// Connection color for a formula category, wrapping around the palette.
pub fn connection_color(category: u32) -> Rgb {
    let palette = &palette_gen::CONNECTION;
    rgb(palette[category as usize % palette.len()])
}

/// Tower fill bucketed by rank, lowest rank first.
pub fn tower_color(rank: u32, max_rank: u32) -> Rgb {
    let palette = &palette_gen::CONNECTION;
    if max_rank == 0 {
        return rgb(palette[0]);
    }
    let bucket = ((palette.len() - 1) as u64 * rank as u64 / max_rank as u64) as usize;
    rgb(palette[bucket.min(palette.len() - 1)])
}

pub fn highlight() -> Rgba {
    with_alpha(rgb(palette_gen::HIGHLIGHT), 255)
}

pub fn background() -> Rgb {
    rgb(palette_gen::BACKGROUND)
}

pub fn grid() -> Rgb {
    rgb(palette_gen::GRID)
}
