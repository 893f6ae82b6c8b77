use quick_xml::{DeError, SeError};
use serde::{Serialize, de::DeserializeOwned};

/// The vCloud v1.5 namespace.
pub const XMLNS: &str = "http://www.vmware.com/vcloud/v1.5";

/// Prepended to every document we send.
pub const XML_HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

/// A top-level API document.
pub trait Document: Serialize + DeserializeOwned {
    /// Name of the root element.
    const ROOT: &'static str;
}

/// Serialize a document, indented, without the XML declaration.
pub fn to_xml<D: Document>(d: &D) -> Result<String, SeError> {
    let mut buf = String::new();
    let mut ser = quick_xml::se::Serializer::with_root(&mut buf, Some(D::ROOT))?;
    ser.indent(' ', 4);
    d.serialize(ser)?;
    Ok(buf)
}

/// Deserialize a document.
///
/// The name of the root element is not checked.
pub fn from_xml<D: Document>(s: &str) -> Result<D, DeError> {
    quick_xml::de::from_str(s)
}
