use crate::edl::{EditCandidate, ExportFormat};

/// Renders an [`EditCandidate`] into one of the supported export formats.
pub fn export(candidate: &EditCandidate, format: ExportFormat) -> String {
    match format {
        ExportFormat::Json => to_json(candidate),
        ExportFormat::Fcpxml => to_fcpxml(candidate),
        ExportFormat::EdlCmx3600 => to_cmx3600(candidate),
        ExportFormat::Davinci => to_davinci(candidate),
        ExportFormat::Premiere => to_premiere(candidate),
    }
}

fn to_json(candidate: &EditCandidate) -> String {
    serde_json::to_string_pretty(candidate).unwrap_or_default()
}

fn to_fcpxml(candidate: &EditCandidate) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!DOCTYPE fcpxml>\n<fcpxml version=\"1.9\">\n  <resources>\n");
    for (idx, decision) in candidate.decisions.iter().enumerate() {
        xml.push_str(&format!(
            "    <asset id=\"r{}\" name=\"{}\" src=\"{}\"/>\n",
            idx + 1,
            decision.scene_id,
            decision.video_url
        ));
    }
    xml.push_str("  </resources>\n  <library>\n    <event name=\"Project\">\n");
    xml.push_str(&format!("      <project name=\"{}\">\n", candidate.name));
    xml.push_str(&format!(
        "        <sequence format=\"r1\" duration=\"{}s\">\n          <spine>\n",
        candidate.total_duration
    ));
    for (idx, decision) in candidate.decisions.iter().enumerate() {
        xml.push_str(&format!(
            "            <clip name=\"{}\" offset=\"{}s\" duration=\"{}s\" start=\"{}s\">\n              <video ref=\"r{}\"/>\n            </clip>\n",
            decision.scene_id,
            decision.start_time,
            decision.duration,
            decision.in_point,
            idx + 1
        ));
    }
    xml.push_str("          </spine>\n        </sequence>\n      </project>\n    </event>\n  </library>\n</fcpxml>\n");
    xml
}

fn seconds_to_timecode(seconds: f64, fps: u32) -> String {
    let hours = (seconds / 3600.0) as u64;
    let minutes = ((seconds % 3600.0) / 60.0) as u64;
    let secs = (seconds % 60.0) as u64;
    let frames = ((seconds % 1.0) * fps as f64) as u64;
    format!("{:02}:{:02}:{:02}:{:02}", hours, minutes, secs, frames)
}

fn to_cmx3600(candidate: &EditCandidate) -> String {
    let mut edl = format!("TITLE: {}\nFCM: NON-DROP FRAME\n\n", candidate.name);
    for (idx, decision) in candidate.decisions.iter().enumerate() {
        let n = idx + 1;
        let source_in = seconds_to_timecode(decision.in_point, 24);
        let source_out = seconds_to_timecode(decision.out_point, 24);
        let record_in = seconds_to_timecode(decision.start_time, 24);
        let record_out = seconds_to_timecode(decision.start_time + decision.duration, 24);
        edl.push_str(&format!(
            "{:03}  AX       V     C        {} {} {} {}\n",
            n, source_in, source_out, record_in, record_out
        ));
        edl.push_str(&format!("* FROM CLIP NAME: {}\n", decision.scene_id));
        if !decision.notes.is_empty() {
            edl.push_str(&format!("* COMMENT: {}\n", decision.notes));
        }
        edl.push('\n');
    }
    edl
}

fn to_davinci(candidate: &EditCandidate) -> String {
    let mut xml = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<xmeml version=\"5\">\n  <sequence id=\"{}\">\n    <name>{}</name>\n    <media>\n      <video>\n        <track>\n",
        candidate.candidate_id, candidate.name
    );
    for decision in &candidate.decisions {
        xml.push_str("          <clipitem>\n");
        xml.push_str(&format!("            <name>{}</name>\n", decision.scene_id));
        xml.push_str(&format!("            <file>{}</file>\n", decision.video_url));
        xml.push_str(&format!("            <in>{}</in>\n", (decision.in_point * 24.0) as i64));
        xml.push_str(&format!("            <out>{}</out>\n", (decision.out_point * 24.0) as i64));
        xml.push_str("          </clipitem>\n");
    }
    xml.push_str("        </track>\n      </video>\n    </media>\n  </sequence>\n</xmeml>\n");
    xml
}

/// Premiere Pro's XMEML dialect wraps the sequence in a `<project>` element
/// and expects `masterclip`/`clipitem` pairing rather than DaVinci's bare
/// clipitem list; timebase is carried at the sequence level instead of
/// being implied by the in/out units.
fn to_premiere(candidate: &EditCandidate) -> String {
    let mut xml = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<xmeml version=\"4\">\n  <project>\n    <name>{}</name>\n    <children>\n      <sequence id=\"{}\">\n        <name>{}</name>\n        <rate>\n          <timebase>24</timebase>\n          <ntsc>FALSE</ntsc>\n        </rate>\n        <media>\n          <video>\n            <track>\n",
        candidate.name, candidate.candidate_id, candidate.name
    );
    for (idx, decision) in candidate.decisions.iter().enumerate() {
        xml.push_str("              <clipitem>\n");
        xml.push_str(&format!("                <name>{}</name>\n", decision.scene_id));
        xml.push_str(&format!("                <masterclipid>masterclip-{}</masterclipid>\n", idx + 1));
        xml.push_str(&format!("                <file>{}</file>\n", decision.video_url));
        xml.push_str(&format!("                <start>{}</start>\n", (decision.start_time * 24.0) as i64));
        xml.push_str(&format!("                <end>{}</end>\n", ((decision.start_time + decision.duration) * 24.0) as i64));
        xml.push_str(&format!("                <in>{}</in>\n", (decision.in_point * 24.0) as i64));
        xml.push_str(&format!("                <out>{}</out>\n", (decision.out_point * 24.0) as i64));
        xml.push_str("              </clipitem>\n");
    }
    xml.push_str("            </track>\n          </video>\n        </media>\n      </sequence>\n    </children>\n  </project>\n</xmeml>\n");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edl::EditDecision;

    fn sample_candidate() -> EditCandidate {
        EditCandidate {
            candidate_id: "balanced_cut".to_string(),
            name: "Balanced Cut".to_string(),
            style: "balanced".to_string(),
            decisions: vec![EditDecision {
                scene_id: "scene_001".to_string(),
                selected_variation: 0,
                video_url: "https://example.test/scene_001.mp4".to_string(),
                in_point: 0.0,
                out_point: 5.0,
                transition_in: "fade_in".to_string(),
                transition_in_duration: 0.5,
                transition_out: "cut".to_string(),
                transition_out_duration: 0.0,
                start_time: 0.0,
                duration: 5.0,
                text_overlay: None,
                text_position: "center".to_string(),
                text_style: "title".to_string(),
                text_start_time: None,
                text_duration: None,
                notes: "Strong opening".to_string(),
            }],
            total_duration: 5.0,
            estimated_quality: 88.0,
            description: String::new(),
            reasoning: String::new(),
            continuity_issues: vec![],
            continuity_score: 100.0,
        }
    }

    #[test]
    fn cmx3600_includes_clip_name_comment() {
        let out = to_cmx3600(&sample_candidate());
        assert!(out.contains("FROM CLIP NAME: scene_001"));
        assert!(out.contains("COMMENT: Strong opening"));
    }

    #[test]
    fn fcpxml_references_asset_per_clip() {
        let out = to_fcpxml(&sample_candidate());
        assert!(out.contains("asset id=\"r1\""));
        assert!(out.contains("video ref=\"r1\""));
    }

    #[test]
    fn premiere_differs_from_davinci_and_wraps_a_project() {
        let candidate = sample_candidate();
        let premiere = to_premiere(&candidate);
        let davinci = to_davinci(&candidate);
        assert_ne!(premiere, davinci);
        assert!(premiere.contains("<project>"));
        assert!(premiere.contains("masterclipid"));
    }

    #[test]
    fn json_round_trips() {
        let candidate = sample_candidate();
        let rendered = to_json(&candidate);
        let parsed: EditCandidate = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed, candidate);
    }
}
