use serde::Serialize;
use tagsieve::{
    bad_protocol, normalize_entities, sanitize_with_protocols, tokenize_attrs, AllowedProtocols,
    Policy,
};

#[derive(Debug, Clone, Default)]
pub struct DebugConfig {
    pub show_tokens: bool,
    pub show_normalized: bool,
    pub verbose: bool,
}

#[derive(Debug, Serialize)]
pub struct InputInfo {
    pub original_string: String,
    pub hex_representation: String,
    pub length: usize,
}

#[derive(Debug, Serialize)]
pub struct TokenInfo {
    pub name: String,
    pub value: String,
    pub whole: String,
    pub scheme_clean: bool,
}

#[derive(Debug, Serialize)]
pub struct TagAnalysis {
    pub span: String,
    pub emitted: String,
    pub dropped: bool,
    pub tokens: Vec<TokenInfo>,
}

#[derive(Debug, Serialize)]
pub struct AnalysisResults {
    pub input_info: InputInfo,
    pub normalized: String,
    pub tags: Vec<TagAnalysis>,
    pub output: String,
}

pub struct PipelineDebugger {
    config: DebugConfig,
    policy: Policy,
    protocols: AllowedProtocols,
}

impl PipelineDebugger {
    pub fn new(config: DebugConfig, policy: Policy, protocols: AllowedProtocols) -> Self {
        PipelineDebugger {
            config,
            policy,
            protocols,
        }
    }

    pub fn config(&self) -> &DebugConfig {
        &self.config
    }

    pub fn analyze(&self, input: &str) -> AnalysisResults {
        let input_info = InputInfo {
            original_string: input.to_string(),
            hex_representation: hex::encode(input.as_bytes()),
            length: input.len(),
        };

        let normalized = normalize_entities(input);
        let tags = self.analyze_tags(&normalized);
        let output = sanitize_with_protocols(input, &self.policy, &self.protocols);

        AnalysisResults {
            input_info,
            normalized,
            tags,
            output,
        }
    }

    /// Walk the normalized text the way the sanitizer does and record what
    /// each tag-shaped span turns into.
    fn analyze_tags(&self, normalized: &str) -> Vec<TagAnalysis> {
        let bytes = normalized.as_bytes();
        let mut tags = Vec::new();
        let mut pos = 0;

        while pos < bytes.len() {
            if bytes[pos] != b'<' {
                pos += 1;
                continue;
            }
            let span_end = match bytes[pos + 1..].iter().position(|&b| b == b'>') {
                Some(rel) => pos + rel + 2,
                None => bytes.len(),
            };
            let span = &normalized[pos..span_end];
            let emitted = sanitize_with_protocols(span, &self.policy, &self.protocols);
            let tokens = self.analyze_span_tokens(span);
            tags.push(TagAnalysis {
                span: span.to_string(),
                dropped: emitted.is_empty(),
                emitted,
                tokens,
            });
            pos = span_end;
        }

        tags
    }

    fn analyze_span_tokens(&self, span: &str) -> Vec<TokenInfo> {
        // Attribute text starts after the element name, if the span has one.
        let interior = span.trim_start_matches('<').trim_end_matches('>');
        let name_len = interior
            .bytes()
            .take_while(|b| b.is_ascii_alphanumeric() || *b == b'/')
            .count();
        let attr_text = &interior[name_len..];

        tokenize_attrs(attr_text, &self.protocols)
            .into_iter()
            .map(|token| TokenInfo {
                scheme_clean: bad_protocol(&token.value, &self.protocols) == token.value,
                name: token.name,
                value: token.value,
                whole: token.whole,
            })
            .collect()
    }
}
