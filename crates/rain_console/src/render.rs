use std::fmt::{self, Write};

use rain_core::{
    format_bundle_label, AppViewModel, HealthView, IssueView, SearchView, SelectedNodeView,
    TreeLine, TreeView, UploadView,
};

use crate::commands::Section;

pub fn render(view: &AppViewModel, sections: &[Section]) -> String {
    let mut out = String::new();
    for section in sections {
        // Writing into a String cannot fail.
        let _ = match section {
            Section::Issue => issue(&mut out, &view.issue),
            Section::Upload => upload(&mut out, &view.upload),
            Section::Recent => recent(&mut out, &view.recent_bundles),
            Section::Tree => tree(&mut out, view),
            Section::Search => search(&mut out, &view.search),
            Section::Health => health(&mut out, &view.health),
        };
    }
    out
}

fn issue(out: &mut String, view: &IssueView) -> fmt::Result {
    if view.loading {
        writeln!(out, "Looking up issue {}...", view.input.trim())?;
    }
    if let Some(error) = &view.error {
        writeln!(out, "Issue lookup: {error}")?;
    }
    match &view.listing {
        Some((name, rows)) => {
            writeln!(out, "Issue {name}: {} bundle(s)", rows.len())?;
            if rows.is_empty() {
                writeln!(out, "  No bundles uploaded yet.")?;
            }
            for (index, row) in rows.iter().enumerate() {
                let name = if row.name.is_empty() { &row.hash } else { &row.name };
                let marker = if row.active { "  (active)" } else { "" };
                writeln!(
                    out,
                    "  {}. {name} [{}] {}{marker}",
                    index + 1,
                    row.status,
                    row.hash
                )?;
            }
        }
        None if view.error.is_none() && !view.loading => {
            writeln!(out, "No issue loaded. Upload files or look up an issue.")?;
        }
        None => {}
    }
    Ok(())
}

fn upload(out: &mut String, view: &UploadView) -> fmt::Result {
    if view.uploading {
        writeln!(out, "Uploading {} file(s)...", view.file_count)?;
    }
    if let Some(error) = &view.error {
        writeln!(out, "Upload: {error}")?;
    }
    if let Some(receipt) = &view.receipt {
        writeln!(
            out,
            "Uploaded {} file(s), {:.1} KB",
            receipt.file_count,
            receipt.total_bytes as f64 / 1024.0
        )?;
        writeln!(out, "  Issue: {}", receipt.issue_code)?;
        writeln!(
            out,
            "  Bundle: {} (ID: {})",
            receipt.bundle_name, receipt.bundle_hash
        )?;
    }
    Ok(())
}

fn recent(out: &mut String, labels: &[String]) -> fmt::Result {
    if labels.is_empty() {
        return writeln!(out, "No recent bundles.");
    }
    writeln!(out, "Recent bundles:")?;
    for (index, label) in labels.iter().enumerate() {
        writeln!(out, "  {}. {label}", index + 1)?;
    }
    Ok(())
}

fn tree(out: &mut String, view: &AppViewModel) -> fmt::Result {
    let tree: &TreeView = &view.tree;
    let Some(bundle_id) = &tree.bundle_id else {
        return writeln!(out, "No bundle selected. Use `issue`, `bundle` or `recent`.");
    };

    match &view.active_bundle {
        Some(bundle) => writeln!(out, "Bundle {}", format_bundle_label(bundle))?,
        None => writeln!(out, "Bundle {bundle_id}")?,
    }
    if tree.loading {
        writeln!(out, "  Loading...")?;
    }
    if let Some(error) = &tree.error {
        writeln!(out, "  Error: {error}")?;
    }

    for line in &tree.lines {
        match line {
            TreeLine::Node(row) => {
                let marker = if row.selected { '>' } else { ' ' };
                let glyph = match (row.is_dir, row.expanded) {
                    (true, true) => '▾',
                    (true, false) => '▸',
                    (false, _) => '•',
                };
                writeln!(
                    out,
                    "{marker} {:indent$}{glyph} {} [{}]",
                    "",
                    row.name,
                    row.id,
                    indent = row.depth * 2
                )?;
            }
            TreeLine::NoChildren { depth } => {
                writeln!(out, "  {:indent$}(empty)", "", indent = depth * 2)?;
            }
        }
    }

    if let Some(selected) = &tree.selected {
        selected_node(out, selected)?;
    }
    Ok(())
}

fn selected_node(out: &mut String, node: &SelectedNodeView) -> fmt::Result {
    writeln!(out, "Selected {} ({})", node.name, node.path)?;
    let kind = if node.is_dir { "directory" } else { "file" };
    writeln!(out, "  {kind}, {}", size_text(node.size_bytes))?;
    if let Some(meta) = &node.meta {
        let text = serde_json::to_string_pretty(meta).unwrap_or_else(|_| meta.to_string());
        writeln!(out, "  meta:")?;
        for line in text.lines() {
            writeln!(out, "    {line}")?;
        }
    }

    if !node.is_dir {
        return Ok(());
    }
    if !node.has_loaded_children {
        return writeln!(out, "  Children not loaded.");
    }
    if node.children.is_empty() {
        return writeln!(out, "  No children.");
    }
    writeln!(out, "  {:<24} {:<16} {:>12}", "NAME", "TYPE", "SIZE")?;
    for child in &node.children {
        writeln!(
            out,
            "  {:<24} {:<16} {:>12}",
            child.name,
            child.kind_label,
            size_text(child.size_bytes)
        )?;
    }
    Ok(())
}

fn search(out: &mut String, view: &SearchView) -> fmt::Result {
    if view.loading {
        writeln!(out, "Searching {}...", view.bundle_id)?;
    }
    if let Some(error) = &view.error {
        writeln!(out, "Search: {error}")?;
    }
    let Some(total) = view.total else {
        if view.error.is_none() && !view.loading {
            writeln!(out, "No search yet.")?;
        }
        return Ok(());
    };

    let (bundle_id, query, timeline) = match &view.scope {
        Some(scope) => (
            scope.bundle_id.as_str(),
            scope.query.as_str(),
            scope.timeline.as_deref(),
        ),
        None => (view.bundle_id.as_str(), view.query.trim(), None),
    };
    let timelines = match timeline {
        Some(timeline) => format!("timeline {timeline}"),
        None => "all timelines".to_string(),
    };
    writeln!(
        out,
        "\"{query}\" in {bundle_id} ({timelines}): {total} match(es), showing {}",
        view.hits.len()
    )?;
    for hit in &view.hits {
        writeln!(out, "  {}", hit.label)?;
        writeln!(out, "    {}", hit.snippet)?;
    }
    Ok(())
}

fn health(out: &mut String, view: &HealthView) -> fmt::Result {
    if view.loading {
        return writeln!(out, "Checking backend...");
    }
    match &view.outcome {
        Some(Ok(report)) => {
            let service = [report.service.as_str(), report.version.as_str()]
                .iter()
                .filter(|part| !part.is_empty())
                .copied()
                .collect::<Vec<_>>()
                .join(" ");
            if service.is_empty() {
                writeln!(out, "Backend {}", report.status)
            } else {
                writeln!(out, "Backend {}: {service}", report.status)
            }
        }
        Some(Err(error)) => writeln!(out, "Backend unreachable: {error}"),
        None => writeln!(out, "Backend not checked yet."),
    }
}

fn size_text(size_bytes: Option<u64>) -> String {
    match size_bytes {
        Some(size) => format!("{size} B"),
        None => "-".to_string(),
    }
}
