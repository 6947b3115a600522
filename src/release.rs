// ABOUTME: Pinned facts about the successor platform release being installed.
// ABOUTME: Package identity, version bounds, and the canonical destination schema.

/// Everything the migration needs to know about one successor release.
///
/// Pinning the package size and digest lets the download step distinguish a
/// completed earlier download from a stale or foreign artifact.
#[derive(Debug, Clone)]
pub struct ReleaseSpec {
    /// Successor release tag, substituted into `package_url_template`.
    pub version: &'static str,
    /// Exact byte size of the release package.
    pub package_size: u64,
    /// Hex SHA-256 digest of the release package.
    pub package_sha256: &'static str,
    /// Download URL with a `{version}` placeholder.
    pub package_url_template: &'static str,
    /// Inclusive legacy-version window this release can migrate from.
    pub min_legacy_version: &'static str,
    pub max_legacy_version: &'static str,
    /// Minimum host runtime version required by the successor.
    pub min_runtime_version: &'static str,
    /// Runtime extensions the successor needs loadable.
    pub required_extensions: &'static [&'static str],
    /// Minimum database server versions per variant.
    pub min_mariadb_version: &'static str,
    pub min_mysql_version: &'static str,
    /// Disk taken by a bare successor install, before any content.
    pub base_install_size: u64,
    /// Table names a fresh successor install creates.
    pub default_tables: &'static [&'static str],
}

impl ReleaseSpec {
    /// Resolve the package download URL for this release.
    pub fn package_url(&self) -> String {
        self.package_url_template.replace("{version}", self.version)
    }
}

/// The release this build migrates to.
pub const RELEASE: ReleaseSpec = ReleaseSpec {
    version: "v1.0.0-beta2",
    package_size: 11_526_232,
    package_sha256: "5c0d1f19f49b1bf8b0f7d4e634e41b9ce0c6f692b19b9e1a3b1cce254a6aa6c9",
    package_url_template: "https://releases.example.org/successor/{version}/successor.tar.gz",
    min_legacy_version: "2.3.1",
    max_legacy_version: "2.5",
    min_runtime_version: "5.6",
    required_extensions: &["pdo", "pdo_mysql"],
    min_mariadb_version: "5.5.3",
    min_mysql_version: "5.5.3",
    base_install_size: 100_000_000,
    default_tables: &[
        "api_key",
        "asset",
        "item",
        "item_item_set",
        "item_set",
        "job",
        "media",
        "migration",
        "module",
        "password_creation",
        "property",
        "resource",
        "resource_class",
        "resource_template",
        "resource_template_property",
        "session",
        "setting",
        "site",
        "site_block_attachment",
        "site_item_set",
        "site_page",
        "site_page_block",
        "site_permission",
        "site_setting",
        "user",
        "value",
        "vocabulary",
    ],
};
