use super::PathTemplate;

// Bundled shape families
//------------------------------------------------------------------------------
// All paths use relative commands only and are authored in a `size`-unit square.
// Holes wind against their outer contour so they stay open under the nonzero rule.

type Raw = (&'static str, &'static str, f64);

const STAR: &str = "m7.28 11.95 3.23 1.49c.47.22 1.01-.17.94-.69l-.42-3.53c-.02-.19.04-.39.17-.53l2.41-2.61c.35-.38.15-1.01-.36-1.11l-3.49-.7c-.19-.04-.36-.16-.45-.33l-1.74-3.1c-.26-.46-.91-.46-1.17 0l-1.74 3.1c-.1.17-.26.29-.45.33l-3.49.7c-.51.1-.71.73-.36 1.11l2.41 2.61c.13.14.2.34.17.53l-.42 3.53c-.06.52.47.9.94.69l3.23-1.49c.21-.08.41-.08.59 0z";
const DIAMOND: &str = "m4 0 4 4-4 4-4-4 4-4 4 4z";
const X: &str = "m8 0-3 0-1 1-1-1-3 0 0 3 1 1-1 1 0 3 3 0 1-1 1 1 3 0 0-3-1-1 1-1z";
const X_ROUNDED: &str = "m10.29 0 0 0c-.98 0-1.93.39-2.63 1.09l-.66.66-.66-.66c-.7-.7-1.64-1.09-2.63-1.09h0c-2.05 0-3.71 1.66-3.71 3.71v0c0 .98.39 1.93 1.09 2.62l.66.67-.66.66c-.7.7-1.09 1.64-1.09 2.63v0c0 2.05 1.66 3.71 3.71 3.71h0c.98 0 1.93-.39 2.62-1.09l.67-.66.66.66c.7.7 1.64 1.09 2.62 1.09h0c2.05 0 3.71-1.66 3.71-3.71v0c0-.98-.39-1.93-1.09-2.62l-.65-.67.66-.66c.7-.7 1.09-1.64 1.09-2.63v0c0-2.05-1.66-3.71-3.71-3.71z";
const CROSS: &str = "m10.5 3.5 0-3.5-7 0 0 3.5-3.5 0 0 7 3.5 0 0 3.5 7 0 0-3.5 3.5 0 0-7z";
const CROSS_ROUNDED: &str = "m10.5 3.5 0 0c0-1.93-1.57-3.5-3.5-3.5h0c-1.93 0-3.5 1.57-3.5 3.5v0h0c-1.93 0-3.5 1.57-3.5 3.5v0c0 1.93 1.57 3.5 3.5 3.5h0v0c0 1.93 1.57 3.5 3.5 3.5h0c1.93 0 3.5-1.57 3.5-3.5v0h0c1.93 0 3.5-1.57 3.5-3.5v0c0-1.93-1.57-3.5-3.5-3.5l0 0z";
const HEART: &str = "m7.01 2.89c3.5-3.46 6.97-1.73 6.99 1.72.01 2.83-4.65 6.81-6.37 8.17-.37.29-.88.29-1.25 0-1.71-1.36-6.38-5.34-6.38-8.16 0-3.46 3.5-5.19 7.01-1.73z";
const SPARKLE: &str = "m7 0c.5 4.2 2.8 6.5 7 7-4.2.5-6.5 2.8-7 7-.5-4.2-2.8-6.5-7-7 4.2-.5 6.5-2.8 7-7z";

static DOTS: [Raw; 8] = [
    ("star", STAR, 14.0),
    ("diamond", DIAMOND, 8.0),
    ("x", X, 8.0),
    ("x-rounded", X_ROUNDED, 14.0),
    ("cross", CROSS, 14.0),
    ("cross-rounded", CROSS_ROUNDED, 14.0),
    ("heart", HEART, 14.0),
    ("sparkle", SPARKLE, 14.0),
];

static CORNER_SQUARES: [Raw; 10] = [
    ("shape1", "m2.5 0h4.5v4.5a2.5 2.5 0 0 1-2.5 2.5h-4.5v-4.5a2.5 2.5 0 0 1 2.5-2.5zm0 1a1.5 1.5 0 0 0-1.5 1.5v3.5h3.5a1.5 1.5 0 0 0 1.5-1.5v-3.5z", 7.0),
    ("shape2", "m0 0h4.5a2.5 2.5 0 0 1 2.5 2.5v4.5h-4.5a2.5 2.5 0 0 1-2.5-2.5zm1 1v3.5a1.5 1.5 0 0 0 1.5 1.5h3.5v-3.5a1.5 1.5 0 0 0-1.5-1.5z", 7.0),
    ("shape3", "m2 0h3a2 2 0 0 1 2 2v3a2 2 0 0 1-2 2h-3a2 2 0 0 1-2-2v-3a2 2 0 0 1 2-2zm0 1a1 1 0 0 0-1 1v3a1 1 0 0 0 1 1h3a1 1 0 0 0 1-1v-3a1 1 0 0 0-1-1z", 7.0),
    ("shape4", "m2 0h3l2 2v3l-2 2h-3l-2-2v-3zm-1 1v5h5v-5z", 7.0),
    ("shape5", "m2 0h5v7h-7v-5a2 2 0 0 1 2-2zm0 1a1 1 0 0 0-1 1v4h5v-5z", 7.0),
    ("shape6", "m3.5 0a3.5 3.5 0 1 1 0 7a3.5 3.5 0 1 1 0-7zm-2 1.5v4h4v-4z", 7.0),
    ("shape7", "m0 0h7v7h-7zm3.5 1a2.5 2.5 0 1 0 0 5a2.5 2.5 0 1 0 0-5z", 7.0),
    ("shape8", "m3.5 0 3.5 3.5-3.5 3.5-3.5-3.5zm0 1.5-2 2 2 2 2-2z", 7.0),
    ("shape9", "m0 0h3.5a3.5 3.5 0 0 1 0 7h-3.5zm1 1v5h2.5a2.5 2.5 0 0 0 0-5z", 7.0),
    ("shape10", "m0 0h7v7h-7zm1.5 1.5v4h4v-4z", 7.0),
];

static CORNER_SQUARES_LAZY: [Raw; 2] = [
    ("shape11", "m0 0h7v7h-7zm2 1a1 1 0 0 0-1 1v3a1 1 0 0 0 1 1h3a1 1 0 0 0 1-1v-3a1 1 0 0 0-1-1z", 7.0),
    ("shape12", "m3.5 0h3.5v3.5a3.5 3.5 0 1 1-3.5-3.5zm0 1a2.5 2.5 0 1 0 2.5 2.5v-2.5z", 7.0),
];

static CORNER_DOTS: [Raw; 13] = [
    ("rounded", "m10 14h-6c-2.21 0-4-1.79-4-4v-6c0-2.21 1.79-4 4-4h6c2.21 0 4 1.79 4 4v6c0 2.21-1.79 4-4 4z", 14.0),
    ("square2", "m15 15-13.9 0-1.1-15 15 1.1z", 15.0),
    ("dot2", "m7 14 0 0c-3.87 0-7-3.13-7-7v-7h7c3.87 0 7 3.13 7 7v0c0 3.87-3.13 7-7 7z", 14.0),
    ("dot3", "m7 0 0 0c3.87 0 7 3.13 7 7v7h-7c-3.87 0-7-3.13-7-7v0c0-3.87 3.13-7 7-7z", 14.0),
    ("dot4", "m0 0h7c3.87 0 7 3.13 7 7v7h-7c-3.87 0-7-3.13-7-7v-7z", 14.0),
    ("sun", "m7.8 1.4 1.38-1.05.49 1.66 1.65-.52-.11 1.74 1.73.07-.69 1.59 1.6.67-1.2 1.26 1.28 1.17-1.56.77.8 1.54-1.72.19.22 1.72-1.68-.41-.38 1.7-1.45-.97-.93 1.47-1.03-1.4-1.38 1.05-.49-1.66-1.65.52.11-1.74-1.73-.07.69-1.59-1.6-.67 1.2-1.26-1.28-1.17 1.56-.77-.8-1.54 1.72-.19-.22-1.72 1.68.41.38-1.7 1.45.97.93-1.47z", 14.0),
    ("star", STAR, 14.0),
    ("diamond", DIAMOND, 8.0),
    ("x", X, 8.0),
    ("x-rounded", X_ROUNDED, 14.0),
    ("cross", CROSS, 14.0),
    ("cross-rounded", CROSS_ROUNDED, 14.0),
    ("heart", HEART, 14.0),
];

static CORNER_DOTS_LAZY: [Raw; 1] = [("square3", "m3 0h8l3 3v8l-3 3h-8l-3-3v-8z", 14.0)];

fn collect(raw: &[Raw]) -> impl Iterator<Item = (String, PathTemplate)> + '_ {
    raw.iter().map(|&(name, path, size)| (name.to_string(), PathTemplate::new(path, size)))
}

pub fn dots() -> impl Iterator<Item = (String, PathTemplate)> {
    collect(&DOTS)
}

pub fn corner_squares() -> impl Iterator<Item = (String, PathTemplate)> {
    collect(&CORNER_SQUARES)
}

pub fn corner_dots() -> impl Iterator<Item = (String, PathTemplate)> {
    collect(&CORNER_DOTS)
}

pub fn corner_squares_lazy() -> impl Iterator<Item = &'static str> {
    CORNER_SQUARES_LAZY.iter().map(|r| r.0)
}

pub fn corner_dots_lazy() -> impl Iterator<Item = &'static str> {
    CORNER_DOTS_LAZY.iter().map(|r| r.0)
}

/// Template of a family that ships with the crate but is only resolved on demand.
pub fn lazy_template(name: &str) -> Option<PathTemplate> {
    CORNER_SQUARES_LAZY
        .iter()
        .chain(CORNER_DOTS_LAZY.iter())
        .find(|r| r.0 == name)
        .map(|&(_, path, size)| PathTemplate::new(path, size))
}
