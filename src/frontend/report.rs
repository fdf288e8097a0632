use std::fmt::Write as _;

use crate::backend::networkmodel::{NetworkSnapshot, SiteView};


fn site_line(view: &SiteView) -> String {
    let frequency = view.frequency.map_or_else(
        || "unassigned".to_string(),
        |frequency| format!("{frequency} MHz")
    );
    let tier = view.tier.map_or_else(
        || "-".to_string(),
        |tier| tier.to_string()
    );
    let marker = if view.selected { " *" } else { "" };
    let reference = view.external_ref.as_ref().map_or_else(
        String::new,
        |external_ref| format!(" ({external_ref})")
    );

    format!(
        "\tSite {}{} [{}]: {} | {:.0} m | tier {} | \
         interference {:.3}{}",
        view.id,
        reference,
        view.technology,
        frequency,
        view.coverage_radius,
        tier,
        view.interference_level,
        marker
    )
}

/// Text rendering of the full snapshot: site table, edge list and the
/// three health metrics.
#[must_use]
pub fn full_report(snapshot: &NetworkSnapshot) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Cell Site Data:");
    for view in &snapshot.sites {
        let _ = writeln!(output, "{}", site_line(view));
    }

    let _ = writeln!(output, "Edges:");
    for (a, b) in &snapshot.edges {
        let _ = writeln!(output, "\t{a} -- {b}");
    }

    let _ = write!(output, "{}", snapshot.metrics);

    output
}

/// The interchange adjacency listing: ordered site id to ordered
/// neighbor ids, one line per active site.
#[must_use]
pub fn adjacency_export(snapshot: &NetworkSnapshot) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Optimized network adjacency:");
    for (site_id, neighbors) in &snapshot.adjacency {
        let _ = writeln!(output, "\t{site_id}: {neighbors:?}");
    }

    output
}
