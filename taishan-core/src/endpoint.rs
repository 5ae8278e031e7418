use std::{convert::TryFrom, fmt};

const BASIC_URL: &str = "https://d1.weather.com.cn/sk_2d/101120801.html";

const FORECAST_URL: &str = "https://api.msn.cn/weather/overview?apikey=j5i4gDqHL6nGYwx5wi5kRhXjtf2c5qgFX9fzfk0TOo&activityId=807965C4-2E6F-47ED-9233-66B1864C80E1&ocid=msftweather&cm=zh-cn&it=edgeid&user=m-181EEE5DD3B7624C2157FAF4D2F46371&scn=APP_ANON&units=C&appId=9e21380c-ff19-4c78-b4ea-19558e93a5d3&wrapodata=false&includemapsmetadata=true&cuthour=true&lifeDays=2&lifeModes=18&includestorm=true&includeLifeActivity=true&lifeSubTypes=1%2C3%2C4%2C10%2C26&insights=65536&startDate=-1&endDate=%2B9&discardFutureInsightTimeseries=true&distanceinkm=0&regionDataCount=20&orderby=distance&days=10&pageOcid=prime-weather%3A%3Aweathertoday-peregrine&source=weather_csr&fdhead=PRG-1SW-WXWPDEL%2CPRG-1SW-WXWPDS%2Cprg-1sw-wxomghd%2Cprg-1sw-wxomghdnr%2Cprg-1sw-wea-waze&region=cn&market=zh-cn&locale=zh-cn&lat=36.19198&lon=117.13526";

const FORECAST_REFERER: &str = "https://www.msn.cn/zh-cn/weather/forecast/in-%E5%B1%B1%E4%B8%9C%E7%9C%81,%E6%B3%B0%E5%AE%89%E5%B8%82?ocid=ansmsnweather&loc=eyJsIjoi5rOw5bGx5Yy6IiwiciI6IuWxseS4nOecgSIsInIyIjoi5rOw5a6J5biCIiwiYyI6IuS4reWNjuS6uuawkeWFseWSjOWbvSIsImkiOiJjbiIsInQiOjEwMiwiZyI6InpoLWNuIiwieCI6IjExNy4xMzUy";

/// Known upstream endpoints, addressed by their constant name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Station snapshot page embedding a `var dataSK = {...};` payload.
    Basic,
    /// Forecast overview JSON document.
    Forecast,
}

impl Endpoint {
    /// Constant name used by clients to pick an endpoint, e.g. `FORECAST_URL`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Basic => "BASIC_URL",
            Endpoint::Forecast => "FORECAST_URL",
        }
    }

    /// Short key used in the config file.
    pub fn key(&self) -> &'static str {
        match self {
            Endpoint::Basic => "basic",
            Endpoint::Forecast => "forecast",
        }
    }

    pub fn default_url(&self) -> &'static str {
        match self {
            Endpoint::Basic => BASIC_URL,
            Endpoint::Forecast => FORECAST_URL,
        }
    }

    /// Headers the upstream expects, without which it rejects or redirects.
    pub fn headers(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Endpoint::Basic => {
                &[("Host", "d1.weather.com.cn"), ("Referer", "https://www.weather.com.cn/")]
            }
            Endpoint::Forecast => &[("Referer", FORECAST_REFERER)],
        }
    }

    pub const fn all() -> &'static [Endpoint] {
        &[Endpoint::Basic, Endpoint::Forecast]
    }

    pub fn from_name(name: &str) -> anyhow::Result<Self> {
        Self::try_from(name)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Endpoint {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Endpoint::all()
            .iter()
            .copied()
            .find(|e| e.as_str() == value)
            .ok_or_else(|| anyhow::anyhow!("No constant with name '{value}' found in UrlConstant."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_name_roundtrip() {
        for endpoint in Endpoint::all() {
            let parsed = Endpoint::from_name(endpoint.as_str()).expect("roundtrip should succeed");
            assert_eq!(*endpoint, parsed);
        }
    }

    #[test]
    fn unknown_endpoint_error() {
        let err = Endpoint::try_from("TAIAN").unwrap_err();
        assert_eq!(err.to_string(), "No constant with name 'TAIAN' found in UrlConstant.");
    }

    #[test]
    fn names_are_case_sensitive() {
        assert!(Endpoint::from_name("forecast_url").is_err());
    }

    #[test]
    fn basic_endpoint_sends_host_and_referer() {
        let names: Vec<_> = Endpoint::Basic.headers().iter().map(|(k, _)| *k).collect();
        assert_eq!(names, ["Host", "Referer"]);
        assert!(Endpoint::Forecast.default_url().starts_with("https://api.msn.cn/weather/overview"));
    }
}
