use axum::http::HeaderMap;

pub const FORWARDED_FOR: &str = "x-forwarded-for";
pub const REAL_IP: &str = "x-real-ip";

// Key used when the caller sent no usable address header
pub const UNKNOWN_CLIENT: &str = "unknown";

// First hop of x-forwarded-for, then x-real-ip, then "unknown".
// Both headers are client controlled unless a proxy rewrites them.
pub fn client_key(headers: &HeaderMap) -> String {
    let forwarded = header_str(headers, FORWARDED_FOR)
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let real_ip = || {
        header_str(headers, REAL_IP)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    };

    forwarded
        .or_else(real_ip)
        .unwrap_or(UNKNOWN_CLIENT)
        .to_string()
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn takes_first_forwarded_hop() {
        let map = headers(&[
            (FORWARDED_FOR, "203.0.113.7, 10.0.0.2, 10.0.0.1"),
            (REAL_IP, "10.0.0.1"),
        ]);
        assert_eq!(client_key(&map), "203.0.113.7");
    }

    #[test]
    fn falls_back_to_real_ip() {
        let map = headers(&[(REAL_IP, "198.51.100.4")]);
        assert_eq!(client_key(&map), "198.51.100.4");
    }

    #[test]
    fn empty_forwarded_hop_falls_through() {
        let map = headers(&[(FORWARDED_FOR, " , 10.0.0.2"), (REAL_IP, "198.51.100.4")]);
        assert_eq!(client_key(&map), "198.51.100.4");
    }

    #[test]
    fn unknown_without_headers() {
        assert_eq!(client_key(&HeaderMap::new()), UNKNOWN_CLIENT);
        assert_eq!(client_key(&headers(&[(REAL_IP, "")])), UNKNOWN_CLIENT);
    }
}
