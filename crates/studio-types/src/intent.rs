use serde::{Deserialize, Serialize};

/// What a script segment IS, as opposed to what it says. Drives visual
/// direction and pacing decisions in the DoP.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SegmentIntent {
    // Structural
    Intro,
    Transition,
    Recap,
    Outro,
    // Exposition
    Context,
    Explanation,
    Definition,
    Narrative,
    // Evidence & data
    Claim,
    Evidence,
    DataWalkthrough,
    FigureReference,
    // Analysis & perspective
    Analysis,
    Comparison,
    Counterpoint,
    Synthesis,
    // Editorial
    Commentary,
    Question,
    Speculation,
}

impl SegmentIntent {
    pub const ALL: [SegmentIntent; 19] = [
        SegmentIntent::Intro,
        SegmentIntent::Transition,
        SegmentIntent::Recap,
        SegmentIntent::Outro,
        SegmentIntent::Context,
        SegmentIntent::Explanation,
        SegmentIntent::Definition,
        SegmentIntent::Narrative,
        SegmentIntent::Claim,
        SegmentIntent::Evidence,
        SegmentIntent::DataWalkthrough,
        SegmentIntent::FigureReference,
        SegmentIntent::Analysis,
        SegmentIntent::Comparison,
        SegmentIntent::Counterpoint,
        SegmentIntent::Synthesis,
        SegmentIntent::Commentary,
        SegmentIntent::Question,
        SegmentIntent::Speculation,
    ];
}
