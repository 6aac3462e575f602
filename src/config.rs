use std::{env, fmt, str::FromStr};

use serde::Deserialize;

use crate::{
    aggregator::QueryShape,
    error::{Error, Result},
};

pub const DEFAULT_API_VERSION: &str = "2024-01";

/// 店铺凭据
///
/// 按请求传递，不在服务端保存。
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub store_domain: String,
    pub access_token: String,
    pub api_version: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("store_domain", &self.store_domain)
            .field("access_token", &"***")
            .field("api_version", &self.api_version)
            .finish()
    }
}

impl Credentials {
    /// 使用默认 API 版本创建凭据
    ///
    /// ```ignore
    /// let credentials = Credentials::new("my-store.myshopify.com", "token")
    ///     .with_api_version("2024-04");
    /// ```
    pub fn new(store_domain: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            store_domain: store_domain.into(),
            access_token: access_token.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// GraphQL 接口地址
    ///
    /// 域名自带 `http://` 或 `https://` 时直接作为前缀，否则补上 `https://`。
    pub fn endpoint(&self) -> String {
        let domain = self.store_domain.trim().trim_end_matches('/');
        let base = if domain.starts_with("http://") || domain.starts_with("https://") {
            domain.to_string()
        } else {
            format!("https://{domain}")
        };
        format!("{base}/api/{}/graphql.json", self.api_version)
    }
}

/// 单次请求携带的凭据覆盖项
///
/// 非空字段逐项覆盖默认凭据，结果只在本次请求内有效。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CredentialOverrides {
    pub domain: Option<String>,
    pub token: Option<String>,
    pub version: Option<String>,
}

impl CredentialOverrides {
    pub fn apply(&self, defaults: &Credentials) -> Credentials {
        fn pick(over: &Option<String>, default: &str) -> String {
            over.as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .unwrap_or(default)
                .to_string()
        }

        Credentials {
            store_domain: pick(&self.domain, &defaults.store_domain),
            access_token: pick(&self.token, &defaults.access_token),
            api_version: pick(&self.version, &defaults.api_version),
        }
    }
}

/// 分页限制
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    /// 未指定 `limit` 时的默认页大小
    pub default_page_size: u32,
    /// 页大小上限
    pub max_page_size: u32,
    /// 导出时最多翻多少页
    pub max_export_pages: usize,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 50,
            max_export_pages: 100,
        }
    }
}

impl PageLimits {
    /// 解析请求中的 `limit`
    ///
    /// 缺省或为空时取默认值，结果限制在 `1..=max_page_size`。
    pub fn resolve(&self, limit: Option<&str>) -> Result<u32> {
        let requested = match limit.map(str::trim).filter(|l| !l.is_empty()) {
            None => self.default_page_size,
            Some(raw) => parse_limit(raw)
                .ok_or_else(|| Error::InvalidParam(format!("limit must be an integer: {raw}")))?,
        };
        Ok(requested.clamp(1, self.max_page_size.max(1)))
    }
}

/// 解析整数形式的 `limit`，超出 `u32` 范围时饱和，负数归零
fn parse_limit(raw: &str) -> Option<u32> {
    let (negative, digits) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if negative {
        return Some(0);
    }
    Some(digits.parse::<u32>().unwrap_or(u32::MAX))
}

/// 进程配置，启动时从环境变量读取一次
#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    pub port: u16,
    pub limits: PageLimits,
    pub query_shape: QueryShape,
}

impl Config {
    /// 从进程环境变量读取配置
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 通过给定的查找函数读取配置
    ///
    /// 缺少 `SHOPIFY_STORE_DOMAIN` 或 `SHOPIFY_STOREFRONT_ACCESS_TOKEN` 时返回
    /// [`Error::Configuration`]。
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &str| {
            get(key).ok_or_else(|| Error::Configuration(format!("`{key}` not set")))
        };

        let credentials = Credentials::new(
            require("SHOPIFY_STORE_DOMAIN")?,
            require("SHOPIFY_STOREFRONT_ACCESS_TOKEN")?,
        )
        .with_api_version(
            get("SHOPIFY_STOREFRONT_API_VERSION").unwrap_or_else(|| DEFAULT_API_VERSION.into()),
        );

        let defaults = PageLimits::default();
        let limits = PageLimits {
            default_page_size: parse_or(&get, "BLOGFEED_DEFAULT_LIMIT", defaults.default_page_size)?,
            max_page_size: parse_or(&get, "BLOGFEED_MAX_LIMIT", defaults.max_page_size)?,
            max_export_pages: parse_or(&get, "BLOGFEED_MAX_EXPORT_PAGES", defaults.max_export_pages)?,
        };

        let query_shape = match get("BLOGFEED_QUERY_SHAPE").as_deref() {
            None | Some("flat") => QueryShape::Flat,
            Some("blogs") => QueryShape::Blogs {
                blog_limit: parse_or(&get, "BLOGFEED_BLOG_LIMIT", 10)?,
            },
            Some(other) => {
                return Err(Error::Configuration(format!(
                    "`BLOGFEED_QUERY_SHAPE` must be `flat` or `blogs`, got `{other}`"
                )));
            }
        };

        Ok(Self {
            credentials,
            port: parse_or(&get, "PORT", 3001)?,
            limits,
            query_shape,
        })
    }
}

fn parse_or<T, F>(get: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match get(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| Error::Configuration(format!("`{key}` is not a valid number: {raw}"))),
    }
}
