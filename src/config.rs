use std::env;
use std::str::FromStr;

pub const DEFAULT_BUCKET_NAME: &str = "default-bucket-name";
pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_MODEL_ID: &str = "amazon.nova-canvas-v1:0";
pub const DEFAULT_PRESIGNED_URL_EXPIRES_IN: u64 = 3600;
pub const DEFAULT_MARKET_DATA_BASE_URL: &str = "https://query2.finance.yahoo.com";
pub const DEFAULT_MARKET_DATA_COOKIE_URL: &str = "https://fc.yahoo.com";
pub const DEFAULT_MARKET_DATA_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

#[derive(Debug, Clone)]
pub struct AwsConfig {
    pub region: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub endpoint_url: Option<String>,
}

impl Default for AwsConfig {
    fn default() -> Self {
        AwsConfig {
            region: None,
            access_key: None,
            secret_key: None,
            endpoint_url: None,
        }
    }
}

impl AwsConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_credentials(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        self.access_key = Some(access_key.into());
        self.secret_key = Some(secret_key.into());
        self
    }

    pub fn with_endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self
    }

    pub fn region_or_default(&self) -> &str {
        self.region.as_deref().unwrap_or(DEFAULT_REGION)
    }
}

/// Fixed image parameters sent with every generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSettings {
    pub model_id: String,
    pub cfg_scale: f32,
    pub quality: String,
    pub number_of_images: u32,
    pub height: u32,
    pub width: u32,
}

impl Default for ImageSettings {
    fn default() -> Self {
        ImageSettings {
            model_id: DEFAULT_MODEL_ID.to_string(),
            cfg_scale: 8.0,
            quality: "standard".to_string(),
            number_of_images: 1,
            height: 720,
            width: 1280,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FunctionConfig {
    pub bucket_name: String,
    pub image: ImageSettings,
    pub presigned_url_expires_in: u64,
    pub unique_object_keys: bool,
    pub bedrock: AwsConfig,
    pub s3: AwsConfig,
}

impl Default for FunctionConfig {
    fn default() -> Self {
        FunctionConfig {
            bucket_name: DEFAULT_BUCKET_NAME.to_string(),
            image: ImageSettings::default(),
            presigned_url_expires_in: DEFAULT_PRESIGNED_URL_EXPIRES_IN,
            unique_object_keys: false,
            bedrock: AwsConfig::new().with_region(DEFAULT_REGION),
            s3: AwsConfig::new().with_region(DEFAULT_REGION),
        }
    }
}

impl FunctionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ImageSettings::default();
        let region = lookup("AWS_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string());
        let credentials = match (lookup("AWS_ACCESS_KEY_ID"), lookup("AWS_SECRET_ACCESS_KEY")) {
            (Some(access_key), Some(secret_key)) => Some((access_key, secret_key)),
            _ => None,
        };

        let mut bedrock =
            AwsConfig::new().with_region(lookup("BEDROCK_REGION").unwrap_or_else(|| region.clone()));
        let mut s3 = AwsConfig::new().with_region(lookup("S3_REGION").unwrap_or(region));
        if let Some((access_key, secret_key)) = credentials {
            bedrock = bedrock.with_credentials(access_key.clone(), secret_key.clone());
            s3 = s3.with_credentials(access_key, secret_key);
        }
        if let Some(endpoint_url) = lookup("S3_ENDPOINT_URL") {
            s3 = s3.with_endpoint_url(endpoint_url);
        }

        FunctionConfig {
            bucket_name: lookup("S3_BUCKET_NAME").unwrap_or_else(|| DEFAULT_BUCKET_NAME.to_string()),
            image: ImageSettings {
                model_id: lookup("FOUNDATION_MODEL_ID").unwrap_or(defaults.model_id),
                cfg_scale: parse_or(&lookup, "CFGSCALE_OF_IMAGE", defaults.cfg_scale),
                quality: lookup("QUALITY_OF_IMAGE").unwrap_or(defaults.quality),
                number_of_images: parse_or(&lookup, "NUMBER_OF_IMAGES", defaults.number_of_images),
                height: parse_or(&lookup, "HEIGHT_OF_IMAGE", defaults.height),
                width: parse_or(&lookup, "WIDTH_OF_IMAGE", defaults.width),
            },
            presigned_url_expires_in: parse_or(
                &lookup,
                "PRESIGNED_URL_EXPIRES_IN",
                DEFAULT_PRESIGNED_URL_EXPIRES_IN,
            ),
            unique_object_keys: lookup("UNIQUE_OBJECT_KEYS").map_or(false, |val| val == "true"),
            bedrock,
            s3,
        }
    }

    pub fn with_bucket(mut self, bucket_name: impl Into<String>) -> Self {
        self.bucket_name = bucket_name.into();
        self
    }

    pub fn with_image_settings(mut self, image: ImageSettings) -> Self {
        self.image = image;
        self
    }

    pub fn with_expiry(mut self, seconds: u64) -> Self {
        self.presigned_url_expires_in = seconds;
        self
    }

    pub fn with_unique_object_keys(mut self, enabled: bool) -> Self {
        self.unique_object_keys = enabled;
        self
    }

    pub fn with_bedrock(mut self, config: AwsConfig) -> Self {
        self.bedrock = config;
        self
    }

    pub fn with_s3(mut self, config: AwsConfig) -> Self {
        self.s3 = config;
        self
    }
}

#[derive(Debug, Clone)]
pub struct MarketDataConfig {
    pub base_url: String,
    /// Visited once per client to pick up the session cookie the crumb is bound to.
    pub cookie_url: String,
    pub user_agent: String,
    /// Pre-seeded crumb; fetched from the provider when absent.
    pub crumb: Option<String>,
}

impl Default for MarketDataConfig {
    fn default() -> Self {
        MarketDataConfig {
            base_url: DEFAULT_MARKET_DATA_BASE_URL.to_string(),
            cookie_url: DEFAULT_MARKET_DATA_COOKIE_URL.to_string(),
            user_agent: DEFAULT_MARKET_DATA_USER_AGENT.to_string(),
            crumb: None,
        }
    }
}

impl MarketDataConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();
        MarketDataConfig {
            base_url: env::var("MARKET_DATA_BASE_URL").unwrap_or(defaults.base_url),
            cookie_url: env::var("MARKET_DATA_COOKIE_URL").unwrap_or(defaults.cookie_url),
            user_agent: env::var("MARKET_DATA_USER_AGENT").unwrap_or(defaults.user_agent),
            crumb: env::var("MARKET_DATA_CRUMB").ok(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_cookie_url(mut self, cookie_url: impl Into<String>) -> Self {
        self.cookie_url = cookie_url.into();
        self
    }

    pub fn with_crumb(mut self, crumb: impl Into<String>) -> Self {
        self.crumb = Some(crumb.into());
        self
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                log::warn!("⚠️  Ignoring unparseable {}={:?}, using default", key, raw);
                default
            }
        },
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = FunctionConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config.bucket_name, "default-bucket-name");
        assert_eq!(config.image.model_id, "amazon.nova-canvas-v1:0");
        assert_eq!(config.image.width, 1280);
        assert_eq!(config.image.height, 720);
        assert_eq!(config.image.cfg_scale, 8.0);
        assert_eq!(config.image.quality, "standard");
        assert_eq!(config.image.number_of_images, 1);
        assert_eq!(config.presigned_url_expires_in, 3600);
        assert!(!config.unique_object_keys);
        assert_eq!(config.bedrock.region_or_default(), "us-east-1");
        assert_eq!(config.s3.region_or_default(), "us-east-1");
        assert!(config.s3.access_key.is_none());
    }

    #[test]
    fn test_env_overrides() {
        let config = FunctionConfig::from_lookup(lookup_from(&[
            ("S3_BUCKET_NAME", "pages"),
            ("AWS_REGION", "eu-west-1"),
            ("S3_REGION", "us-east-2"),
            ("S3_ENDPOINT_URL", "https://s3.us-east-2.amazonaws.com"),
            ("WIDTH_OF_IMAGE", "512"),
            ("CFGSCALE_OF_IMAGE", "6.5"),
            ("PRESIGNED_URL_EXPIRES_IN", "60"),
            ("UNIQUE_OBJECT_KEYS", "true"),
            ("AWS_ACCESS_KEY_ID", "AKIA"),
            ("AWS_SECRET_ACCESS_KEY", "secret"),
        ]));
        assert_eq!(config.bucket_name, "pages");
        assert_eq!(config.bedrock.region_or_default(), "eu-west-1");
        assert_eq!(config.s3.region_or_default(), "us-east-2");
        assert_eq!(
            config.s3.endpoint_url.as_deref(),
            Some("https://s3.us-east-2.amazonaws.com")
        );
        assert_eq!(config.image.width, 512);
        assert_eq!(config.image.cfg_scale, 6.5);
        assert_eq!(config.presigned_url_expires_in, 60);
        assert!(config.unique_object_keys);
        assert_eq!(config.bedrock.access_key.as_deref(), Some("AKIA"));
    }

    #[test]
    fn test_unparseable_number_falls_back() {
        let config = FunctionConfig::from_lookup(lookup_from(&[("HEIGHT_OF_IMAGE", "tall")]));
        assert_eq!(config.image.height, 720);
    }

    #[test]
    fn test_builders() {
        let config = FunctionConfig::new()
            .with_bucket("b")
            .with_expiry(10)
            .with_unique_object_keys(true);
        assert_eq!(config.bucket_name, "b");
        assert_eq!(config.presigned_url_expires_in, 10);
        assert!(config.unique_object_keys);

        let market = MarketDataConfig::new()
            .with_base_url("http://localhost:9000")
            .with_cookie_url("http://localhost:9000/cookie")
            .with_crumb("abc");
        assert_eq!(market.base_url, "http://localhost:9000");
        assert_eq!(market.cookie_url, "http://localhost:9000/cookie");
        assert_eq!(market.crumb.as_deref(), Some("abc"));
    }
}
