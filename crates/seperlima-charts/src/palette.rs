//! Faculty colors. Purely cosmetic: unknown faculties still get a color.

/// Fixed colors for the faculties of the current deployment.
pub const FACULTY_COLORS: [(&str, &str); 3] = [
    ("Fakultas Sains dan Teknologi Informasi", "#3B82F6"),
    ("Fakultas Pembangunan Berkelanjutan", "#22C55E"),
    ("Fakultas Rekayasa dan Teknologi Industri", "#EF4444"),
];

/// Fallback palette for anything not in `FACULTY_COLORS`.
pub const DEFAULT_PALETTE: [&str; 10] = [
    "#636EFA", "#EF553B", "#00CC96", "#AB63FA", "#FFA15A", "#19D3F3", "#FF6692", "#B6E880",
    "#FF97FF", "#FECB52",
];

pub fn known_faculty_color(name: &str) -> Option<&'static str> {
    FACULTY_COLORS
        .iter()
        .find(|(faculty, _)| *faculty == name)
        .map(|(_, color)| *color)
}

/// `(faculty, color)` pairs for `names`, in the given order.
///
/// Unknown names take successive `DEFAULT_PALETTE` entries, wrapping around.
pub fn faculty_color_map<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<(String, String)> {
    let mut unknown = 0;
    names
        .into_iter()
        .map(|name| {
            let color = known_faculty_color(name).unwrap_or_else(|| {
                let c = DEFAULT_PALETTE[unknown % DEFAULT_PALETTE.len()];
                unknown += 1;
                c
            });
            (name.to_string(), color.to_string())
        })
        .collect()
}
