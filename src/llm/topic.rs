use serde::{Serialize, Serializer};

use crate::llm::Oracle;
use crate::retry::{with_retry, RetryPolicy};

/// Scientific field a question belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    Physics,
    Astronomy,
    Biology,
    ComputerScience,
    Medicine,
    Chemistry,
    EarthScience,
    Mathematics,
    Engineering,
    EnvironmentalScience,
    Neuroscience,
    SocialSciences,
    Psychology,
    Genetics,
    MaterialScience,
    EnergyScience,
    Robotics,
    ClimateScience,
    Geology,
    Oceanography,
    Unknown,
}

impl Topic {
    pub const ALL: [Topic; 20] = [
        Topic::Physics,
        Topic::Astronomy,
        Topic::Biology,
        Topic::ComputerScience,
        Topic::Medicine,
        Topic::Chemistry,
        Topic::EarthScience,
        Topic::Mathematics,
        Topic::Engineering,
        Topic::EnvironmentalScience,
        Topic::Neuroscience,
        Topic::SocialSciences,
        Topic::Psychology,
        Topic::Genetics,
        Topic::MaterialScience,
        Topic::EnergyScience,
        Topic::Robotics,
        Topic::ClimateScience,
        Topic::Geology,
        Topic::Oceanography,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Topic::Physics => "Physics",
            Topic::Astronomy => "Astronomy",
            Topic::Biology => "Biology",
            Topic::ComputerScience => "AI & Computer Science",
            Topic::Medicine => "Medicine",
            Topic::Chemistry => "Chemistry",
            Topic::EarthScience => "Earth Science",
            Topic::Mathematics => "Mathematics",
            Topic::Engineering => "Engineering",
            Topic::EnvironmentalScience => "Environmental Science",
            Topic::Neuroscience => "Neuroscience",
            Topic::SocialSciences => "Social Sciences",
            Topic::Psychology => "Psychology",
            Topic::Genetics => "Genetics",
            Topic::MaterialScience => "Material Science",
            Topic::EnergyScience => "Energy Science",
            Topic::Robotics => "Robotics",
            Topic::ClimateScience => "Climate Science",
            Topic::Geology => "Geology",
            Topic::Oceanography => "Oceanography",
            Topic::Unknown => "Unknown",
        }
    }

    /// Match an oracle answer against the known topic names.
    /// Case and a trailing period are ignored; anything else is `Unknown`.
    pub fn from_answer(answer: &str) -> Topic {
        let answer = answer.trim().trim_end_matches('.').trim();
        Topic::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(answer))
            .unwrap_or(Topic::Unknown)
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Topic {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Classify `query` into one of [`Topic::ALL`], or `Unknown`.
pub async fn classify_topic(oracle: &dyn Oracle, policy: &RetryPolicy, query: &str) -> Topic {
    if query.trim().is_empty() {
        return Topic::Unknown;
    }

    let names: Vec<&str> = Topic::ALL.iter().map(|t| t.name()).collect();
    let prompt = format!(
        "Classify the following query into one of these scientific topics: {}. \
         If none match, return 'Unknown'.\nQuery: {query}\nTopic:",
        names.join(", ")
    );
    let prompt = prompt.as_str();

    match with_retry(policy, "Topic classification", None, move || async move {
        oracle.generate(prompt).await.map(Some)
    })
    .await
    {
        Ok(Some(answer)) => Topic::from_answer(&answer),
        Ok(None) => Topic::Unknown,
        Err(e) => {
            tracing::warn!("Topic classification failed: {e}");
            Topic::Unknown
        }
    }
}
