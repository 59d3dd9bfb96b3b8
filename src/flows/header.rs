/// Mutable framework identity reported on every token-endpoint request.
///
/// Host SDKs (web framework wrappers, mobile shells) fill these in at
/// startup; the core leaves them unset.
#[derive(Debug, Clone, Default)]
pub struct FrameworkSettings {
    pub framework: Option<String>,
    pub framework_version: Option<String>,
    pub sdk_version: Option<String>,
}

pub(crate) const SDK_HEADER: &str = "Kinde-SDK";

const PLATFORM_TAG: &str = "Rust";

impl FrameworkSettings {
    /// Header value `{framework}/{sdkVersion}/{frameworkVersion}/{platform}`.
    ///
    /// Missing identity fields are omitted; the platform tag is always the
    /// final segment.
    pub fn sdk_header_value(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        for field in [&self.framework, &self.sdk_version, &self.framework_version] {
            match field.as_deref() {
                Some(value) if !value.is_empty() => parts.push(value),
                _ => {}
            }
        }
        parts.push(PLATFORM_TAG);
        parts.join("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_identity_renders_all_segments() {
        let settings = FrameworkSettings {
            framework: Some("Framework".to_string()),
            framework_version: Some("Version".to_string()),
            sdk_version: Some("SDKVersion".to_string()),
        };
        assert_eq!(settings.sdk_header_value(), "Framework/SDKVersion/Version/Rust");
    }

    #[test]
    fn unset_identity_is_just_the_platform_tag() {
        assert_eq!(FrameworkSettings::default().sdk_header_value(), "Rust");
    }

    #[test]
    fn missing_fields_are_omitted_not_blank() {
        let settings = FrameworkSettings {
            framework: Some("Framework".to_string()),
            framework_version: None,
            sdk_version: Some("1.2.3".to_string()),
        };
        assert_eq!(settings.sdk_header_value(), "Framework/1.2.3/Rust");
    }

    #[test]
    fn empty_strings_count_as_missing() {
        let settings = FrameworkSettings {
            framework: Some(String::new()),
            framework_version: Some("v".to_string()),
            sdk_version: None,
        };
        assert_eq!(settings.sdk_header_value(), "v/Rust");
    }
}
