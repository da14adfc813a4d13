/// Image reference seen as `/`-separated segments
///
/// ```text
/// gcr.io/google_containers/kube-apiserver-amd64:v1.9.0
/// ^^^^^^ ^^^^^^^^^^^^^^^^^ ^^^^^^^^^^^^^^^^^^^^^^^^^^^
/// host   path              path (with tag)
/// ```
///
/// No validation is done: the first segment is called the host even for
/// Docker Hub names like `apache/flink`, and a tag or digest stays glued to
/// the last segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUri<'a> {
    uri: &'a str,
    segments: Vec<&'a str>,
}

impl<'a> ImageUri<'a> {
    pub fn parse(uri: &'a str) -> Self {
        ImageUri {
            uri,
            segments: uri.split('/').collect(),
        }
    }

    /// All segments including the host, never empty
    pub fn segments(&self) -> &[&'a str] {
        &self.segments
    }

    /// Split into repository and tag (or digest) as the engine API expects them
    ///
    /// ```
    /// use k8s_image::ImageUri;
    ///
    /// assert_eq!(ImageUri::parse("nginx:1.25.1").split_tag(), ("nginx", "1.25.1"));
    /// assert_eq!(ImageUri::parse("10.0.0.1:5000/nginx").split_tag(), ("10.0.0.1:5000/nginx", "latest"));
    /// ```
    pub fn split_tag(&self) -> (&'a str, &'a str) {
        let uri = self.uri;
        if let Some((repository, digest)) = uri.split_once('@') {
            return (repository, digest);
        }
        // A colon before the last slash belongs to `host:port`
        let name_start = uri.rfind('/').map(|i| i + 1).unwrap_or(0);
        match uri[name_start..].rfind(':') {
            Some(i) => (&uri[..name_start + i], &uri[name_start + i + 1..]),
            None => (uri, "latest"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments() {
        let uri = ImageUri::parse("ghcr.io/fluxcd/flux2/flux-cli:v2.0.0");
        assert_eq!(
            uri.segments(),
            &["ghcr.io", "fluxcd", "flux2", "flux-cli:v2.0.0"]
        );
        assert_eq!(ImageUri::parse("nginx:1.25.1").segments(), &["nginx:1.25.1"]);

        // Never fails even for garbage
        assert_eq!(ImageUri::parse("").segments(), &[""]);
        assert_eq!(ImageUri::parse("a//b/").segments(), &["a", "", "b", ""]);
    }

    #[test]
    fn split_tag() {
        let split = |uri| ImageUri::parse(uri).split_tag();
        assert_eq!(
            split("gcr.io/google_containers/kube-apiserver-amd64:v1.9.0"),
            ("gcr.io/google_containers/kube-apiserver-amd64", "v1.9.0")
        );
        assert_eq!(split("alpine"), ("alpine", "latest"));
        assert_eq!(
            split("10.0.0.1:5000/apache/flink:1.11.2-scala_2.12-java11"),
            ("10.0.0.1:5000/apache/flink", "1.11.2-scala_2.12-java11")
        );
        assert_eq!(
            split("localhost:5000/pause"),
            ("localhost:5000/pause", "latest")
        );
        assert_eq!(
            split("quay.io/coreos/etcd@sha256:0f1e8d3b4e5a6c7d"),
            ("quay.io/coreos/etcd", "sha256:0f1e8d3b4e5a6c7d")
        );
    }
}
