use crate::api::Error;

/// Base URL for a Metrics Router region, including `private.<region>` forms.
pub fn service_url_for_region(region: &str) -> Result<&'static str, Error> {
    let url = match region {
        "au-syd.dev" => "https://au-syd.metrics-router.dev.cloud.ibm.com",
        "us-south" => "https://us-south.metrics-router.cloud.ibm.com",
        "private.us-south" => "https://private.us-south.metrics-router.cloud.ibm.com",
        "us-east" => "https://us-east.metrics-router.cloud.ibm.com",
        "private.us-east" => "https://private.us-east.metrics-router.cloud.ibm.com",
        "eu-de" => "https://eu-de.metrics-router.cloud.ibm.com",
        "private.eu-de" => "https://private.eu-de.metrics-router.cloud.ibm.com",
        "eu-gb" => "https://eu-gb.metrics-router.cloud.ibm.com",
        "private.eu-gb" => "https://private.eu-gb.metrics-router.cloud.ibm.com",
        "au-syd" => "https://au-syd.metrics-router.cloud.ibm.com",
        "private.au-syd" => "https://private.au-syd.metrics-router.cloud.ibm.com",
        _ => return Err(Error::UnknownRegion(region.to_string())),
    };
    Ok(url)
}
