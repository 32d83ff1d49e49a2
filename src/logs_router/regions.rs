use crate::api::Error;

/// Base URL for a Logs Router region, including `private.<region>` forms.
pub fn service_url_for_region(region: &str) -> Result<&'static str, Error> {
    let url = match region {
        "au-syd" => "https://api.au-syd.logs-router.cloud.ibm.com/v3",
        "private.au-syd" => "https://api.private.au-syd.logs-router.cloud.ibm.com/v3",
        "br-sao" => "https://api.br-sao.logs-router.cloud.ibm.com/v3",
        "private.br-sao" => "https://api.private.br-sao.logs-router.cloud.ibm.com/v3",
        "ca-mon" => "https://api.ca-mon.logs-router.cloud.ibm.com/v3",
        "private.ca-mon" => "https://api.private.ca-mon.logs-router.cloud.ibm.com/v3",
        "ca-tor" => "https://api.ca-tor.logs-router.cloud.ibm.com/v3",
        "private.ca-tor" => "https://api.private.ca-tor.logs-router.cloud.ibm.com/v3",
        "eu-de" => "https://api.eu-de.logs-router.cloud.ibm.com/v3",
        "private.eu-de" => "https://api.private.eu-de.logs-router.cloud.ibm.com/v3",
        "eu-es" => "https://api.eu-es.logs-router.cloud.ibm.com/v3",
        "private.eu-es" => "https://api.private.eu-es.logs-router.cloud.ibm.com/v3",
        "eu-fr2" => "https://api.eu-fr2.logs-router.cloud.ibm.com/v3",
        "private.eu-fr2" => "https://api.private.eu-fr2.logs-router.cloud.ibm.com/v3",
        "eu-gb" => "https://api.eu-gb.logs-router.cloud.ibm.com/v3",
        "private.eu-gb" => "https://api.private.eu-gb.logs-router.cloud.ibm.com/v3",
        "jp-osa" => "https://api.jp-osa.logs-router.cloud.ibm.com/v3",
        "private.jp-osa" => "https://api.private.jp-osa.logs-router.cloud.ibm.com/v3",
        "jp-tok" => "https://api.jp-tok.logs-router.cloud.ibm.com/v3",
        "private.jp-tok" => "https://api.private.jp-tok.logs-router.cloud.ibm.com/v3",
        "us-east" => "https://api.us-east.logs-router.cloud.ibm.com/v3",
        "private.us-east" => "https://api.private.us-east.logs-router.cloud.ibm.com/v3",
        "us-south" => "https://api.us-south.logs-router.cloud.ibm.com/v3",
        "private.us-south" => "https://api.private.us-south.logs-router.cloud.ibm.com/v3",
        _ => return Err(Error::UnknownRegion(region.to_string())),
    };
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_and_private() {
        assert_eq!(
            service_url_for_region("eu-de").unwrap(),
            "https://api.eu-de.logs-router.cloud.ibm.com/v3"
        );
        assert_eq!(
            service_url_for_region("private.jp-tok").unwrap(),
            "https://api.private.jp-tok.logs-router.cloud.ibm.com/v3"
        );
    }

    #[test]
    fn test_every_region_follows_the_pattern() {
        for region in [
            "au-syd", "br-sao", "ca-mon", "ca-tor", "eu-de", "eu-es", "eu-fr2", "eu-gb", "jp-osa",
            "jp-tok", "us-east", "us-south",
        ] {
            assert_eq!(
                service_url_for_region(region).unwrap(),
                format!("https://api.{}.logs-router.cloud.ibm.com/v3", region)
            );
            let private = format!("private.{}", region);
            assert_eq!(
                service_url_for_region(&private).unwrap(),
                format!("https://api.{}.logs-router.cloud.ibm.com/v3", private)
            );
        }
    }

    #[test]
    fn test_unknown_region() {
        let err = service_url_for_region("INVALID_REGION").unwrap_err();
        assert_eq!(err.to_string(), "service URL for region 'INVALID_REGION' not found");
        assert!(service_url_for_region("").is_err());
    }
}
