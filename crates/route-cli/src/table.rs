//! Plain text route listing.

use route_core::Route;

/// One header line plus one line per route: `FROM TO DIST TIME`.
pub fn format_route_table(routes: &[Route]) -> String {
    let mut out = format!("{:<6} {:<6} {:>10} {:>7}\n", "FROM", "TO", "DIST", "TIME");
    for route in routes {
        out.push_str(&format!(
            "{:<6} {:<6} {:>10} {:>7}\n",
            route.from.icao,
            route.to.icao,
            format!("{} nm", route.rounded_distance_nm()),
            route.formatted_time()
        ));
    }
    out
}
