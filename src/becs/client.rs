use anyhow::Result;
use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::Client;
use std::time::Duration;

use super::types::BecsObject;

const SOAP_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
const BECS_NS: &str = "urn:becs";

/// Client for the BECS element-management SOAP API.
/// Calls are session-based: login first, pass the session id in a SOAP
/// header on every request, logout when done.
pub struct BecsClient {
    url: String,
    client: Client,
    session_id: Option<String>,
}

impl BecsClient {
    pub fn new(url: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            url,
            client,
            session_id: None,
        })
    }

    pub async fn login(&mut self, username: &str, password: &str) -> Result<()> {
        let body = format!(
            "<becs:sessionLogin><becs:in><becs:username>{}</becs:username><becs:password>{}</becs:password></becs:in></becs:sessionLogin>",
            xml_escape(username),
            xml_escape(password),
        );
        let response = self.call("sessionLogin", &body).await?;
        match find_text(&response, "sessionid") {
            Some(session_id) => {
                self.session_id = Some(session_id);
                Ok(())
            }
            None => Err(anyhow::anyhow!("BECS login response carried no session id")),
        }
    }

    pub async fn logout(&mut self) -> Result<()> {
        if self.session_id.is_some() {
            self.call("sessionLogout", "<becs:sessionLogout/>").await?;
            self.session_id = None;
        }
        Ok(())
    }

    /// Fetch all element-attach objects in the tree
    pub async fn get_elements(&self) -> Result<Vec<BecsObject>> {
        self.object_tree_find(1, "element-attach", -1).await
    }

    /// Fetch the interfaces of one element together with their
    /// resource-inet children
    pub async fn get_element_tree(&self, oid: i64) -> Result<Vec<BecsObject>> {
        self.object_tree_find(oid, "interface,resource-inet", 2).await
    }

    async fn object_tree_find(&self, oid: i64, classmask: &str, walkdown: i64) -> Result<Vec<BecsObject>> {
        let body = format!(
            "<becs:objectTreeFind><becs:in><becs:oid>{}</becs:oid><becs:classmask>{}</becs:classmask><becs:walkdown>{}</becs:walkdown></becs:in></becs:objectTreeFind>",
            oid,
            xml_escape(classmask),
            walkdown,
        );
        let response = self.call("objectTreeFind", &body).await?;
        parse_objects(&response)
    }

    async fn call(&self, action: &str, body: &str) -> Result<String> {
        let resp = self
            .client
            .post(&self.url)
            .header("Content-Type", "text/xml; charset=utf-8")
            .header("SOAPAction", format!("{}#{}", BECS_NS, action))
            .body(envelope(self.session_id.as_deref(), body))
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("BECS API error {}: {}", status, text));
        }

        let text = resp.text().await?;
        if let Some(fault) = find_text(&text, "faultstring") {
            return Err(anyhow::anyhow!("BECS fault in {}: {}", action, fault));
        }
        Ok(text)
    }
}

fn envelope(session_id: Option<&str>, body: &str) -> String {
    let header = match session_id {
        Some(sid) => format!(
            "<soapenv:Header><becs:request><becs:sessionid>{}</becs:sessionid></becs:request></soapenv:Header>",
            xml_escape(sid)
        ),
        None => String::new(),
    };
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?><soapenv:Envelope xmlns:soapenv=\"{}\" xmlns:becs=\"{}\">{}<soapenv:Body>{}</soapenv:Body></soapenv:Envelope>",
        SOAP_NS, BECS_NS, header, body
    )
}

fn xml_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Text content of the first element with the given local name
pub(crate) fn find_text(xml: &str, tag: &str) -> Option<String> {
    let mut reader = Reader::from_str(xml);
    let mut capture = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == tag.as_bytes() => capture = true,
            Ok(Event::Text(t)) if capture => {
                let text = t.unescape().ok()?;
                let text = text.trim();
                if !text.is_empty() {
                    return Some(text.to_string());
                }
            }
            Ok(Event::End(e)) if e.local_name().as_ref() == tag.as_bytes() => capture = false,
            Ok(Event::Eof) | Err(_) => return None,
            _ => {}
        }
    }
}

/// Parse the repeated <objects> entries of an objectTreeFind response.
/// Matching is on local names, so namespace prefixes do not matter.
pub(crate) fn parse_objects(xml: &str) -> Result<Vec<BecsObject>> {
    let mut reader = Reader::from_str(xml);

    let mut objects = Vec::new();
    let mut current: Option<BecsObject> = None;
    let mut in_resource = false;
    let mut field: Option<String> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                match name.as_str() {
                    "objects" => current = Some(BecsObject::default()),
                    "resource" if current.is_some() => in_resource = true,
                    _ if current.is_some() => field = Some(name),
                    _ => {}
                }
            }
            Event::Text(t) => {
                if let (Some(object), Some(name)) = (current.as_mut(), field.as_deref()) {
                    let text = t.unescape()?.trim().to_string();
                    if text.is_empty() {
                        continue;
                    }
                    match name {
                        "oid" => object.oid = text.parse().unwrap_or(0),
                        "parentoid" => object.parentoid = text.parse().unwrap_or(0),
                        "class" => object.class = text,
                        "name" if !in_resource => object.name = text,
                        "elementtype" => object.elementtype = text,
                        "flags" => object.flags = Some(text),
                        "role" => object.role = text,
                        "alarmtimeperiod" => object.alarm_timeperiod = text,
                        "alarmdestination" => object.alarm_destination = text,
                        "address" if in_resource => object.address = text,
                        "prefixlen" if in_resource => object.prefixlen = text.parse().ok(),
                        _ => {}
                    }
                }
            }
            Event::End(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                match name.as_str() {
                    "objects" => {
                        if let Some(object) = current.take() {
                            objects.push(object);
                        }
                    }
                    "resource" => in_resource = false,
                    _ => field = None,
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(objects)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TREE_RESPONSE: &str = r#"<?xml version="1.0"?>
        <soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/" xmlns:becs="urn:becs">
          <soapenv:Body>
            <becs:objectTreeFindResponse>
              <becs:out>
                <becs:objects>
                  <becs:oid>100</becs:oid>
                  <becs:parentoid>10</becs:parentoid>
                  <becs:class>interface</becs:class>
                  <becs:name>loopback0</becs:name>
                  <becs:role>mgmt</becs:role>
                </becs:objects>
                <becs:objects>
                  <becs:oid>101</becs:oid>
                  <becs:parentoid>100</becs:parentoid>
                  <becs:class>resource-inet</becs:class>
                  <becs:resource>
                    <becs:address>10.0.0.2</becs:address>
                    <becs:prefixlen>32</becs:prefixlen>
                  </becs:resource>
                </becs:objects>
                <becs:objects>
                  <becs:oid>102</becs:oid>
                  <becs:parentoid>10</becs:parentoid>
                  <becs:class>interface</becs:class>
                  <becs:name>ethernet0</becs:name>
                  <becs:flags>disable</becs:flags>
                </becs:objects>
              </becs:out>
            </becs:objectTreeFindResponse>
          </soapenv:Body>
        </soapenv:Envelope>"#;

    #[test]
    fn test_parse_objects() {
        let objects = parse_objects(TREE_RESPONSE).unwrap();
        assert_eq!(objects.len(), 3);

        assert_eq!(objects[0].class, "interface");
        assert_eq!(objects[0].name, "loopback0");
        assert_eq!(objects[0].role, "mgmt");
        assert!(objects[0].active());

        assert_eq!(objects[1].class, "resource-inet");
        assert_eq!(objects[1].parentoid, 100);
        assert_eq!(objects[1].prefix().as_deref(), Some("10.0.0.2/32"));

        assert_eq!(objects[2].name, "ethernet0");
        assert!(!objects[2].active());
    }

    #[test]
    fn test_find_text() {
        let xml = "<e:Envelope xmlns:e=\"x\"><e:Body><e:out><e:sessionid>abc123</e:sessionid></e:out></e:Body></e:Envelope>";
        assert_eq!(find_text(xml, "sessionid").as_deref(), Some("abc123"));
        assert_eq!(find_text(xml, "missing"), None);
    }

    #[test]
    fn test_envelope_carries_session_header() {
        let xml = envelope(Some("s1"), "<becs:sessionLogout/>");
        assert!(xml.contains("<becs:sessionid>s1</becs:sessionid>"));
        assert!(xml.contains("<becs:sessionLogout/>"));
        assert!(envelope(None, "<x/>").contains("<soapenv:Body><x/></soapenv:Body>"));
    }

    #[test]
    fn test_xml_escape() {
        assert_eq!(xml_escape("a<b>&\"c\""), "a&lt;b&gt;&amp;&quot;c&quot;");
    }
}
