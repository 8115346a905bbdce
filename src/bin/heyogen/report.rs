//! Console output for `--report` and `--stats`.

use heyogen::{CoherenceReport, ProjectComponents, Severity};

pub fn print_coherence(report: &CoherenceReport) {
    println!();
    if report.is_coherent {
        println!("✓ Coherence check passed");
        return;
    }

    println!("Coherence issues ({}):", report.total_issues);
    for issue in &report.issues {
        println!(
            "  [{:<6}] {:<24} {}",
            issue.severity, issue.issue_type, issue.description
        );
    }
    println!(
        "  high: {}  medium: {}  low: {}",
        report.count_by_severity(Severity::High),
        report.count_by_severity(Severity::Medium),
        report.count_by_severity(Severity::Low)
    );
}

pub fn print_stats(
    components: &ProjectComponents,
    json_bytes: usize,
    document_bytes: Option<usize>,
) {
    println!();
    println!("Project statistics:");
    println!("  Project ID: {}", components.metadata.id);
    println!("  Title:      {}", components.metadata.name);
    println!(
        "  Format:     {} {}s {} ({})",
        components.metadata.video_type,
        components.metadata.duration,
        components.metadata.aspect_ratio,
        components.metadata.resolution
    );
    println!();
    println!("  Characters:     {}", components.characters.len());
    println!("  Acts:           {}", components.story.acts.len());
    println!("  Scenes:         {}", components.story.total_scenes());
    println!("  Dialogue lines: {}", components.dialogue.total_lines);
    println!("  Sequences:      {}", components.sequence_plan.sequences.len());
    println!("  Shots:          {}", components.sequence_plan.total_shots);
    println!("  Music cues:     {}", components.music.timeline.len());
    println!();
    println!("  Output JSON:    {:>10} bytes", json_bytes);
    if let Some(size) = document_bytes {
        println!("  Automerge doc:  {:>10} bytes", size);
        println!(
            "  Compression:    {:>10.2}x",
            json_bytes as f64 / size as f64
        );
    }
}
