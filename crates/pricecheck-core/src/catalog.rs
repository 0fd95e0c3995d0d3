use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Strict monetary pattern: `$`, digits with optional thousands separators,
/// a decimal point and exactly two decimal digits.
pub const DEFAULT_PRICE_PATTERN: &str = r"\$[0-9,]+\.\d{2}";

/// How a vendor's product pages are searched for a price.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// CSS selectors tried in order before the fallback pattern.
    #[serde(default)]
    pub selectors: Vec<String>,
    /// Regex applied to the whole page text. At most one capture group.
    #[serde(default)]
    pub pattern: Option<String>,
}

impl ExtractionConfig {
    /// The configured fallback pattern, or [`DEFAULT_PRICE_PATTERN`] when
    /// none is set or it is blank.
    #[must_use]
    pub fn fallback_pattern(&self) -> &str {
        self.pattern
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or(DEFAULT_PRICE_PATTERN)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorConfig {
    /// Stable key used by product `endpoints`, e.g. `"discount-mugs"`.
    pub id: String,
    /// Column heading in the report.
    pub name: String,
    /// Expected host for this vendor's endpoints; only used for warnings.
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(flatten)]
    pub extraction: ExtractionConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub name: String,
    /// Vendor id to product page URL.
    pub endpoints: BTreeMap<String, String>,
}

impl ProductRecord {
    #[must_use]
    pub fn endpoint(&self, vendor_id: &str) -> Option<&str> {
        self.endpoints.get(vendor_id).map(String::as_str)
    }
}

/// The parsed catalog file. Vendor order is the report's column order and
/// product order is its row order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    pub vendors: Vec<VendorConfig>,
    pub products: Vec<ProductRecord>,
}

impl CatalogFile {
    #[must_use]
    pub fn vendor(&self, id: &str) -> Option<&VendorConfig> {
        self.vendors.iter().find(|v| v.id == id)
    }
}

/// Load and validate the catalog from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_catalog(path: &Path) -> Result<CatalogFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CatalogFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_catalog(&content)
}

/// Parse and validate catalog YAML.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_catalog(content: &str) -> Result<CatalogFile, ConfigError> {
    let catalog: CatalogFile = serde_yaml::from_str(content)?;
    validate_catalog(&catalog)?;
    Ok(catalog)
}

fn is_valid_vendor_id(id: &str) -> bool {
    !id.is_empty()
        && !id.starts_with('-')
        && !id.ends_with('-')
        && id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

fn validate_catalog(catalog: &CatalogFile) -> Result<(), ConfigError> {
    if catalog.vendors.is_empty() {
        return Err(ConfigError::Validation(
            "catalog must declare at least one vendor".to_string(),
        ));
    }

    let mut vendor_ids = HashSet::new();
    for vendor in &catalog.vendors {
        if !is_valid_vendor_id(&vendor.id) {
            return Err(ConfigError::Validation(format!(
                "vendor id '{}' must be lowercase letters, digits and inner dashes",
                vendor.id
            )));
        }
        if vendor.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "vendor '{}' must have a non-empty name",
                vendor.id
            )));
        }
        if !vendor_ids.insert(vendor.id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate vendor id: '{}'",
                vendor.id
            )));
        }
    }

    let mut seen_names = HashSet::new();
    for product in &catalog.products {
        if product.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "product name must be non-empty".to_string(),
            ));
        }

        if !seen_names.insert(product.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate product name: '{}'",
                product.name
            )));
        }

        if let Some(unknown) = product
            .endpoints
            .keys()
            .find(|id| !vendor_ids.contains(id.as_str()))
        {
            return Err(ConfigError::Validation(format!(
                "product '{}' has an endpoint for unknown vendor '{unknown}'",
                product.name
            )));
        }

        for vendor in &catalog.vendors {
            let Some(url) = product.endpoint(&vendor.id) else {
                return Err(ConfigError::Validation(format!(
                    "product '{}' is missing an endpoint for vendor '{}'",
                    product.name, vendor.id
                )));
            };
            if let Err(reason) = check_endpoint_url(url) {
                return Err(ConfigError::Validation(format!(
                    "product '{}' has an invalid endpoint for vendor '{}': {reason}",
                    product.name, vendor.id
                )));
            }
        }
    }

    Ok(())
}

fn check_endpoint_url(raw: &str) -> Result<(), String> {
    let url = reqwest::Url::parse(raw).map_err(|e| format!("\"{raw}\" is not a URL: {e}"))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("\"{raw}\" must use http or https"));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(format!("\"{raw}\" has no host"));
    }
    Ok(())
}

/// A suspicious but non-fatal catalog entry, typically a copy-paste slip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogWarning {
    /// The endpoint's host is not the vendor's declared domain.
    ForeignHost {
        product: String,
        vendor: String,
        host: String,
        expected: String,
    },
    /// One product uses the same URL for two different vendors.
    SharedAcrossVendors {
        product: String,
        url: String,
        first_vendor: String,
        second_vendor: String,
    },
    /// One vendor uses the same URL for two different products.
    ReusedEndpoint {
        vendor: String,
        url: String,
        first_product: String,
        second_product: String,
    },
}

impl std::fmt::Display for CatalogWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogWarning::ForeignHost {
                product,
                vendor,
                host,
                expected,
            } => write!(
                f,
                "product '{product}': endpoint for vendor '{vendor}' points at {host}, expected {expected}"
            ),
            CatalogWarning::SharedAcrossVendors {
                product,
                url,
                first_vendor,
                second_vendor,
            } => write!(
                f,
                "product '{product}': vendors '{first_vendor}' and '{second_vendor}' share endpoint {url}"
            ),
            CatalogWarning::ReusedEndpoint {
                vendor,
                url,
                first_product,
                second_product,
            } => write!(
                f,
                "vendor '{vendor}': products '{first_product}' and '{second_product}' share endpoint {url}"
            ),
        }
    }
}

fn host_matches_domain(host: &str, domain: &str) -> bool {
    let host = host.to_ascii_lowercase();
    let domain = domain.trim().trim_start_matches("www.").to_ascii_lowercase();
    host == domain || host.ends_with(&format!(".{domain}"))
}

/// Soft consistency checks over a validated catalog.
///
/// Warnings are reported in catalog order: per product, per vendor.
#[must_use]
pub fn catalog_warnings(catalog: &CatalogFile) -> Vec<CatalogWarning> {
    let mut warnings = Vec::new();
    let mut first_use: HashMap<(&str, &str), &str> = HashMap::new();

    for product in &catalog.products {
        let mut seen_in_product: HashMap<&str, &str> = HashMap::new();

        for vendor in &catalog.vendors {
            let Some(url) = product.endpoint(&vendor.id) else {
                continue;
            };

            if let Some(expected) = vendor.domain.as_deref() {
                let host = reqwest::Url::parse(url)
                    .ok()
                    .and_then(|u| u.host_str().map(str::to_owned));
                if let Some(host) = host {
                    if !host_matches_domain(&host, expected) {
                        warnings.push(CatalogWarning::ForeignHost {
                            product: product.name.clone(),
                            vendor: vendor.id.clone(),
                            host,
                            expected: expected.to_string(),
                        });
                    }
                }
            }

            if let Some(first_vendor) = seen_in_product.get(url) {
                warnings.push(CatalogWarning::SharedAcrossVendors {
                    product: product.name.clone(),
                    url: url.to_string(),
                    first_vendor: (*first_vendor).to_string(),
                    second_vendor: vendor.id.clone(),
                });
            } else {
                seen_in_product.insert(url, &vendor.id);
            }

            match first_use.get(&(vendor.id.as_str(), url)) {
                Some(first_product) => warnings.push(CatalogWarning::ReusedEndpoint {
                    vendor: vendor.id.clone(),
                    url: url.to_string(),
                    first_product: (*first_product).to_string(),
                    second_product: product.name.clone(),
                }),
                None => {
                    first_use.insert((vendor.id.as_str(), url), &product.name);
                }
            }
        }
    }

    warnings
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
