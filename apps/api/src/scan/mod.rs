// Upload surface: receives the résumé, stores it for later viewing, and hands
// the bytes to the scanner held in `AppState`.

pub mod handlers;
pub mod uploads;
