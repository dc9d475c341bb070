use std::fmt;

/// A possibly qualified C++ name such as `std::vector`.
///
/// C names are always a single segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct QualName {
    segments: Vec<String>,
}

impl QualName {
    pub fn new<S: Into<String>>(segments: impl IntoIterator<Item = S>) -> Self {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Append a segment, producing `self::segment`.
    pub fn join(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The unqualified name.
    pub fn last(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or("")
    }

    pub fn is_qualified(&self) -> bool {
        self.segments.len() > 1
    }

    pub fn is_empty(&self) -> bool {
        self.segments.iter().all(String::is_empty)
    }
}

impl fmt::Display for QualName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str("::")?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

impl From<&str> for QualName {
    fn from(name: &str) -> Self {
        Self::new([name])
    }
}

impl From<String> for QualName {
    fn from(name: String) -> Self {
        Self::new([name])
    }
}

impl From<&String> for QualName {
    fn from(name: &String) -> Self {
        Self::new([name.as_str()])
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for QualName {
    fn from(segments: [S; N]) -> Self {
        Self::new(segments)
    }
}

impl From<Vec<String>> for QualName {
    fn from(segments: Vec<String>) -> Self {
        Self { segments }
    }
}
