//! Judge call and reply parsing.

use crate::errors::MetricError;
use crate::providers::llm::LlmClient;
use serde_json::Value;

pub(crate) const MAX_RAW_SCORE: f64 = 10.0;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ScoreReply {
    pub(crate) score: f64,
    pub(crate) reason: String,
}

pub(crate) async fn call_judge(
    client: &dyn LlmClient,
    metric: &str,
    prompt: &str,
) -> anyhow::Result<Value> {
    let system = [super::prompt::system_prompt(metric)];
    let resp = client.complete(prompt, Some(&system[..])).await?;
    extract_json(&resp.text).map_err(|message| MetricError::judge_response(metric, message).into())
}

/// First JSON object in `text`, tolerating prose or code fences around it.
pub(crate) fn extract_json(text: &str) -> Result<Value, String> {
    let text = text.trim();
    let start = text
        .find('{')
        .ok_or_else(|| "no JSON object found in judge output".to_string())?;

    serde_json::Deserializer::from_str(&text[start..])
        .into_iter::<Value>()
        .next()
        .ok_or_else(|| "no JSON object found in judge output".to_string())?
        .map_err(|e| format!("invalid JSON in judge output: {}", e))
}

pub(crate) fn parse_steps(metric: &str, value: &Value) -> Result<Vec<String>, MetricError> {
    let steps: Vec<String> = value
        .get("steps")
        .and_then(|v| v.as_array())
        .ok_or_else(|| MetricError::judge_response(metric, "missing 'steps' list"))?
        .iter()
        .filter_map(|s| s.as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if steps.is_empty() {
        return Err(MetricError::judge_response(
            metric,
            "'steps' contains no usable steps",
        ));
    }
    Ok(steps)
}

pub(crate) fn parse_score(metric: &str, value: &Value) -> Result<ScoreReply, MetricError> {
    let score = match value.get("score") {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| MetricError::judge_response(metric, "missing numeric 'score'"))?;

    if !score.is_finite() || !(0.0..=MAX_RAW_SCORE).contains(&score) {
        return Err(MetricError::judge_response(
            metric,
            format!("score {} outside 0-10", score),
        ));
    }

    let reason = value
        .get("reason")
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .ok_or_else(|| MetricError::judge_response(metric, "missing non-empty 'reason'"))?
        .to_string();

    Ok(ScoreReply { score, reason })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_fenced_json() {
        let text = "Here is my verdict:\n```json\n{\"score\": 9, \"reason\": \"tight\"}\n```\nThanks";
        let v = extract_json(text).unwrap();
        assert_eq!(v["score"], 9);
    }

    #[test]
    fn rejects_text_without_json() {
        let err = extract_json("I think it is fine.").unwrap_err();
        assert!(err.contains("no JSON object"));
    }

    #[test]
    fn score_accepts_numeric_strings() {
        let reply = parse_score("m", &json!({"score": " 4 ", "reason": "meh"})).unwrap();
        assert_eq!(reply.score, 4.0);
        assert_eq!(reply.reason, "meh");
    }

    #[test]
    fn score_out_of_range_is_rejected() {
        let err = parse_score("m", &json!({"score": 11, "reason": "x"})).unwrap_err();
        assert!(err.to_string().contains("outside 0-10"));
        let err = parse_score("m", &json!({"score": -1, "reason": "x"})).unwrap_err();
        assert!(err.to_string().contains("outside 0-10"));
    }

    #[test]
    fn blank_reason_is_rejected() {
        let err = parse_score("m", &json!({"score": 5, "reason": "  "})).unwrap_err();
        assert!(matches!(err, MetricError::JudgeResponse { .. }));
    }

    #[test]
    fn steps_are_trimmed_and_filtered() {
        let steps = parse_steps("m", &json!({"steps": [" a ", "", 3, "b"]})).unwrap();
        assert_eq!(steps, vec!["a", "b"]);
        assert!(parse_steps("m", &json!({"steps": []})).is_err());
        assert!(parse_steps("m", &json!({"score": 1})).is_err());
    }
}
