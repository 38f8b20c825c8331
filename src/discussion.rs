//! Discussion records and the structured digests returned by the LLM.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a comment, unique and stable for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CommentId(pub i64);

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single post in the discussion thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub author: String,
    /// Free-form specialty label, e.g. "Cardiology"
    pub specialty: String,
    /// Human-readable age label, e.g. "2h ago"
    pub time: String,
    pub text: String,
}

impl Comment {
    pub fn new(
        id: i64,
        author: impl Into<String>,
        specialty: impl Into<String>,
        time: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            id: CommentId(id),
            author: author.into(),
            specialty: specialty.into(),
            time: time.into(),
            text: text.into(),
        }
    }

    /// First letter of the author's last name, used as an avatar.
    pub fn initial(&self) -> char {
        self.author
            .split_whitespace()
            .last()
            .and_then(|name| name.chars().next())
            .unwrap_or('?')
    }
}

/// Draft comment as entered in the compose form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewComment {
    pub author: String,
    pub specialty: String,
    pub text: String,
}

impl NewComment {
    pub fn new(
        author: impl Into<String>,
        specialty: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            author: author.into(),
            specialty: specialty.into(),
            text: text.into(),
        }
    }
}

/// Digest of one comment.
///
/// Fields default to empty so a reply that omits them still parses; the
/// renderer shows nothing for an empty field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CommentSummary {
    /// Two or three sentence summary of the comment's clinical point
    pub summary: String,
    /// The single most important takeaway
    pub key_point: String,
}

impl CommentSummary {
    pub fn is_empty(&self) -> bool {
        self.summary.trim().is_empty() && self.key_point.trim().is_empty()
    }
}

/// An opinion attributed to one participant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyInsight {
    pub author: String,
    pub insight: String,
}

/// Digest of the whole discussion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DiscussionSummary {
    /// One sentence clinical bottom line
    pub tldr: String,
    pub consensus: Vec<String>,
    pub key_insights: Vec<KeyInsight>,
    pub action_items: Vec<String>,
}

impl DiscussionSummary {
    /// Check if the summary has any content
    pub fn is_empty(&self) -> bool {
        self.tldr.trim().is_empty()
            && self.consensus.is_empty()
            && self.key_insights.is_empty()
            && self.action_items.is_empty()
    }
}

/// The seeded case discussion the application opens with.
pub fn sample_discussion() -> Vec<Comment> {
    vec![
        Comment::new(
            1,
            "Dr. Sarah Chen",
            "Cardiology",
            "2h ago",
            "Seeing a 58yo male post-CABG with persistent AF. Currently on amiodarone 200mg daily. Considering rhythm vs rate control strategy. Any thoughts on long-term management given his EF of 35%?",
        ),
        Comment::new(
            2,
            "Dr. James Okafor",
            "Electrophysiology",
            "1h 50m ago",
            "With EF 35%, rhythm control would be my preference. EAST-AFNET trial showed benefit in patients with HF. However, amiodarone toxicity is a real concern long-term. Have you considered ablation? Recent data from CASTLE-AF is compelling for HFrEF patients.",
        ),
        Comment::new(
            3,
            "Dr. Priya Nair",
            "Internal Medicine",
            "1h 40m ago",
            "I'd second the ablation consideration. In my experience, catheter ablation has been superior to AAD therapy in maintaining sinus rhythm in post-CABG patients. What's the duration of AF? Paroxysmal or persistent?",
        ),
        Comment::new(
            4,
            "Dr. Martin Reyes",
            "Cardiology",
            "1h 30m ago",
            "Don't overlook anticoagulation here. CHA2DS2-VASc score? With HF and post-CABG status, likely high risk. I'd ensure solid anticoagulation regardless of rhythm strategy.",
        ),
        Comment::new(
            5,
            "Dr. Sarah Chen",
            "Cardiology",
            "1h 20m ago",
            "AF is persistent, ~6 months duration. CHA2DS2-VASc is 4. He's on apixaban. Good point on ablation - was hesitant given surgical complexity but CASTLE-AF data is convincing.",
        ),
        Comment::new(
            6,
            "Dr. James Okafor",
            "Electrophysiology",
            "1h ago",
            "6 months persistent with EF 35% - ablation makes strong sense. I'd consider cardioversion first to assess reversibility of cardiomyopathy. If tachycardia-mediated component, restoring SR could improve EF significantly. Then plan for ablation if recurs.",
        ),
        Comment::new(
            7,
            "Dr. Anita Voss",
            "Cardiac Surgery",
            "50m ago",
            "Surgical perspective: post-CABG anatomy matters for ablation access. Was the surgery recent? Adhesions could complicate catheter navigation. Worth imaging beforehand.",
        ),
        Comment::new(
            8,
            "Dr. Priya Nair",
            "Internal Medicine",
            "40m ago",
            "Agree with cardioversion trial. Also worth checking thyroid function if not done recently - amiodarone can cause both hypo and hyperthyroidism, either of which would make AF harder to control.",
        ),
        Comment::new(
            9,
            "Dr. Leon Hartmann",
            "Pharmacology",
            "30m ago",
            "On the amiodarone point - if you're already at 200mg and planning long-term, baseline PFTs, LFTs, and thyroid are essential. Annual follow-up on these. Pulmonary toxicity risk is dose-cumulative.",
        ),
        Comment::new(
            10,
            "Dr. Martin Reyes",
            "Cardiology",
            "20m ago",
            "Summary from my end: anticoagulation secured ✓, EF warrants rhythm control strategy, cardioversion trial reasonable, ablation as definitive if needed, amiodarone monitoring essential if continuing.",
        ),
    ]
}
