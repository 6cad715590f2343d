// src/acl.rs
//
// Canned ACL vocabulary and scope rules.

use std::fmt;

use crate::error::AclError;

/// What a locator addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Bucket,
    Object,
}

/// The closed set of canned policies a target can carry. Token matching is
/// exact and case-sensitive; anything else is an input error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CannedAcl {
    Private,
    PublicRead,
    PublicReadWrite,
    /// Objects only: defer to the ACL of the containing bucket.
    Default,
}

impl CannedAcl {
    /// Parse `token` for a target of the given scope.
    pub fn parse(token: &str, scope: Scope) -> Result<Self, AclError> {
        let acl = match token {
            "private" => CannedAcl::Private,
            "public-read" => CannedAcl::PublicRead,
            "public-read-write" => CannedAcl::PublicReadWrite,
            "default" => CannedAcl::Default,
            _ => {
                let tail = match scope {
                    Scope::Object => " or default",
                    Scope::Bucket => "",
                };
                return Err(AclError::input(format!(
                    "invalid ACL '{}': expected private, public-read, public-read-write{}",
                    token, tail
                )));
            }
        };
        if acl == CannedAcl::Default && scope == Scope::Bucket {
            return Err(AclError::input(
                "ACL 'default' applies to objects, not buckets",
            ));
        }
        Ok(acl)
    }

    /// The wire token for this policy.
    pub fn as_str(&self) -> &'static str {
        match self {
            CannedAcl::Private => "private",
            CannedAcl::PublicRead => "public-read",
            CannedAcl::PublicReadWrite => "public-read-write",
            CannedAcl::Default => "default",
        }
    }
}

impl fmt::Display for CannedAcl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_three_shared_tokens_at_either_scope() {
        for (token, acl) in [
            ("private", CannedAcl::Private),
            ("public-read", CannedAcl::PublicRead),
            ("public-read-write", CannedAcl::PublicReadWrite),
        ] {
            assert_eq!(CannedAcl::parse(token, Scope::Bucket).unwrap(), acl);
            assert_eq!(CannedAcl::parse(token, Scope::Object).unwrap(), acl);
        }
    }

    #[test]
    fn default_is_object_only() {
        assert_eq!(
            CannedAcl::parse("default", Scope::Object).unwrap(),
            CannedAcl::Default
        );
        assert!(CannedAcl::parse("default", Scope::Bucket).is_err());
    }

    #[test]
    fn rejects_unknown_and_lookalike_tokens() {
        for bad in [
            "", "def", "erracl", "私有", "public_read", "Private", "PRIVATE", " private",
        ] {
            assert!(
                CannedAcl::parse(bad, Scope::Object).is_err(),
                "{bad:?} should not parse"
            );
            assert!(CannedAcl::parse(bad, Scope::Bucket).is_err());
        }
    }

    #[test]
    fn display_matches_wire_tokens() {
        assert_eq!(CannedAcl::PublicReadWrite.to_string(), "public-read-write");
        assert_eq!(CannedAcl::Default.to_string(), "default");
    }
}
