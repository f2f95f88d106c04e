//! The bundled token set rendered as a Tailwind v4 stylesheet at compile time.

pub const APP_CSS: &str = include_str!(concat!(env!("OUT_DIR"), "/app.css"));

#[test]
fn test() {
    assert!(APP_CSS.starts_with("@import 'tailwindcss';"));
    assert!(APP_CSS.contains("@utility typography-body {"));
    assert!(APP_CSS.contains("@media (min-width: theme(screens.xl)) {"));
}
