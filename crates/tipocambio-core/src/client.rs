//! Rate clients for the two shapes of the indicators web service.
//!
//! | Variant | Method | Endpoint | Caller name | Auth |
//! |---------|--------|----------|-------------|------|
//! | [`PublicRateClient`] | GET, query string | fixed public URL | current Unix timestamp | none |
//! | [`AuthenticatedRateClient`] | POST, form body | configured | site name | email + token |
//!
//! Both return the raw body on HTTP 200 and never retry.

use std::fmt::{Debug, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use time::OffsetDateTime;
use tracing::debug;

use crate::domain::{DateRange, Indicator};
use crate::http_client::{HttpClient, HttpRequest};
use crate::TransportError;

/// Public GET endpoint of the BCCR indicators service.
pub const PUBLIC_ENDPOINT: &str = "https://gee.bccr.fi.cr/indicadoreseconomicos/WebServices/wsIndicadoresEconomicos.asmx/ObtenerIndicadoresEconomicosXML";

/// Value of the sub-levels flag: only the requested series, no breakdown.
pub const NO_SUB_LEVELS: &str = "N";

/// Authorization fields for the authenticated service variant.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub site_name: String,
    pub email: String,
    pub token: String,
}

impl Credentials {
    pub fn new(
        site_name: impl Into<String>,
        email: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            site_name: site_name.into(),
            email: email.into(),
            token: token.into(),
        }
    }
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("site_name", &self.site_name)
            .field("email", &self.email)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Fetches the raw indicator document for a date window.
pub trait RateClient: Send + Sync {
    fn fetch<'a>(
        &'a self,
        range: DateRange,
        indicator: Indicator,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>, TransportError>> + Send + 'a>>;
}

async fn execute(
    http_client: &dyn HttpClient,
    request: HttpRequest,
) -> Result<Vec<u8>, TransportError> {
    let response = http_client.execute(request).await?;
    if response.status != 200 {
        return Err(TransportError::Status {
            status: response.status,
        });
    }
    Ok(response.body)
}

/// Unauthenticated query-string GET against the public endpoint.
#[derive(Clone)]
pub struct PublicRateClient {
    http_client: Arc<dyn HttpClient>,
    endpoint: String,
    caller_name: Option<String>,
    timeout_ms: u64,
}

impl PublicRateClient {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            endpoint: String::from(PUBLIC_ENDPOINT),
            caller_name: None,
            timeout_ms: 15_000,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Fixed caller name instead of the per-request timestamp.
    pub fn with_caller_name(mut self, caller_name: impl Into<String>) -> Self {
        self.caller_name = Some(caller_name.into());
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn build_request(&self, range: DateRange, indicator: Indicator) -> HttpRequest {
        let caller_name = self
            .caller_name
            .clone()
            .unwrap_or_else(|| OffsetDateTime::now_utc().unix_timestamp().to_string());

        HttpRequest::get_with_query(
            self.endpoint.as_str(),
            &[
                ("tcIndicador", indicator.code().to_string()),
                ("tcFechaInicio", range.start_wire()),
                ("tcFechaFinal", range.end_wire()),
                ("tcNombre", caller_name),
                ("tnSubNiveles", String::from(NO_SUB_LEVELS)),
            ],
        )
        .with_timeout_ms(self.timeout_ms)
    }
}

impl RateClient for PublicRateClient {
    fn fetch<'a>(
        &'a self,
        range: DateRange,
        indicator: Indicator,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>, TransportError>> + Send + 'a>> {
        Box::pin(async move {
            debug!(
                indicator = indicator.code(),
                range = %range,
                "fetching public indicator series"
            );
            let request = self.build_request(range, indicator);
            execute(self.http_client.as_ref(), request).await
        })
    }
}

/// Form-encoded POST carrying email/token authorization.
#[derive(Clone)]
pub struct AuthenticatedRateClient {
    http_client: Arc<dyn HttpClient>,
    endpoint: String,
    credentials: Credentials,
    timeout_ms: u64,
}

impl AuthenticatedRateClient {
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        endpoint: impl Into<String>,
        credentials: Credentials,
    ) -> Self {
        Self {
            http_client,
            endpoint: endpoint.into(),
            credentials,
            timeout_ms: 15_000,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn build_request(&self, range: DateRange, indicator: Indicator) -> HttpRequest {
        HttpRequest::post_form(
            self.endpoint.as_str(),
            &[
                ("Indicador", indicator.code().to_string()),
                ("FechaInicio", range.start_wire()),
                ("FechaFinal", range.end_wire()),
                ("Nombre", self.credentials.site_name.clone()),
                ("SubNiveles", String::from(NO_SUB_LEVELS)),
                ("CorreoElectronico", self.credentials.email.clone()),
                ("Token", self.credentials.token.clone()),
            ],
        )
        .with_timeout_ms(self.timeout_ms)
    }
}

impl RateClient for AuthenticatedRateClient {
    fn fetch<'a>(
        &'a self,
        range: DateRange,
        indicator: Indicator,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>, TransportError>> + Send + 'a>> {
        Box::pin(async move {
            debug!(
                indicator = indicator.code(),
                range = %range,
                endpoint = %self.endpoint,
                "fetching authenticated indicator series"
            );
            let request = self.build_request(range, indicator);
            execute(self.http_client.as_ref(), request).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::{HttpError, HttpMethod, HttpResponse, ReqwestHttpClient};

    fn range() -> DateRange {
        DateRange::parse("05/01/2024", "15/01/2024").expect("valid")
    }

    struct StatusClient(u16);

    impl HttpClient for StatusClient {
        fn execute<'a>(
            &'a self,
            _request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            let status = self.0;
            Box::pin(async move { Ok(HttpResponse::new(status, "<string/>")) })
        }
    }

    #[test]
    fn public_request_uses_query_parameters() {
        let client = PublicRateClient::new(Arc::new(ReqwestHttpClient::new()))
            .with_endpoint("https://example.test/ws")
            .with_caller_name("1704434400")
            .with_timeout_ms(2_000);

        let request = client.build_request(range(), Indicator::Buying);

        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(
            request.url,
            "https://example.test/ws?tcIndicador=317&tcFechaInicio=05%2F01%2F2024\
             &tcFechaFinal=15%2F01%2F2024&tcNombre=1704434400&tnSubNiveles=N"
        );
        assert_eq!(request.timeout_ms, 2_000);
    }

    #[test]
    fn public_caller_name_defaults_to_timestamp() {
        let client = PublicRateClient::new(Arc::new(ReqwestHttpClient::new()));
        let request = client.build_request(range(), Indicator::Selling);

        assert!(request.url.starts_with(PUBLIC_ENDPOINT));
        let caller = request
            .url
            .split('&')
            .find_map(|pair| pair.strip_prefix("tcNombre="))
            .expect("caller name present");
        assert!(caller.parse::<i64>().is_ok(), "caller name: {caller}");
    }

    #[test]
    fn authenticated_request_posts_credentials() {
        let client = AuthenticatedRateClient::new(
            Arc::new(ReqwestHttpClient::new()),
            "https://example.test/ws",
            Credentials::new("Mi Sitio", "ops@example.test", "ABC123"),
        );

        let request = client.build_request(range(), Indicator::Selling);

        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.url, "https://example.test/ws");
        assert_eq!(
            request.body.as_deref(),
            Some(
                "Indicador=318&FechaInicio=05%2F01%2F2024&FechaFinal=15%2F01%2F2024\
                 &Nombre=Mi%20Sitio&SubNiveles=N&CorreoElectronico=ops%40example.test&Token=ABC123"
            )
        );
    }

    #[test]
    fn credentials_debug_hides_token() {
        let rendered = format!("{:?}", Credentials::new("site", "a@b.c", "secret-token"));
        assert!(!rendered.contains("secret-token"));
    }

    #[tokio::test]
    async fn only_status_200_is_success() {
        let ok = PublicRateClient::new(Arc::new(StatusClient(200)));
        assert_eq!(
            ok.fetch(range(), Indicator::Buying).await,
            Ok(b"<string/>".to_vec())
        );

        for status in [201, 404, 500] {
            let client = PublicRateClient::new(Arc::new(StatusClient(status)));
            assert_eq!(
                client.fetch(range(), Indicator::Buying).await,
                Err(TransportError::Status { status })
            );
        }
    }
}
