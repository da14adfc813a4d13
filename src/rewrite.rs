//! Rewrite image references for the Docker Hub mirror and for private registries
//!
//! Both rewrites are total: a reference matching no rule is returned as is.

use crate::ImageUri;

/// Reference of the same image in the Docker Hub mirror `namespace`
///
/// | source                                   | mirror                                |
/// |:-----------------------------------------|:--------------------------------------|
/// | `ghcr.io/<a>/<b>/<c>`                    | `<namespace>/ghcr.<a>.<b>.<c>`        |
/// | `gcr.io/<a>/<b>`                         | `<namespace>/<a>.<b>`                 |
/// | `{registry.k8s.io,k8s.gcr.io}/<a>/<b>`   | `<namespace>/google-containers.<a>.<b>` |
/// | `{registry.k8s.io,k8s.gcr.io}/<a>`       | `<namespace>/google_containers.<a>`   |
///
/// ```
/// use k8s_image::rewrite::to_mirror;
///
/// assert_eq!(
///     to_mirror("k8s.gcr.io/pause-amd64:3.1", "anjia0532"),
///     "anjia0532/google_containers.pause-amd64:3.1"
/// );
/// assert_eq!(to_mirror("nginx:1.25.1", "anjia0532"), "nginx:1.25.1");
/// ```
pub fn to_mirror(image: &str, namespace: &str) -> String {
    match ImageUri::parse(image).segments() {
        ["ghcr.io", a, b, c] => format!("{}/ghcr.{}.{}.{}", namespace, a, b, c),
        ["gcr.io", a, b] => format!("{}/{}.{}", namespace, a, b),
        ["registry.k8s.io" | "k8s.gcr.io", a, b] => {
            format!("{}/google-containers.{}.{}", namespace, a, b)
        }
        ["registry.k8s.io" | "k8s.gcr.io", a] => format!("{}/google_containers.{}", namespace, a),
        _ => image.to_string(),
    }
}

/// Reference of the same image in the private registry at `address` (`host:port`)
///
/// The registry host is replaced by `address` and the repository path is kept.
/// Docker Hub names (`nginx`, `apache/flink`) are put under `address` as they are.
///
/// ```
/// use k8s_image::rewrite::to_private;
///
/// assert_eq!(
///     to_private("apache/flink:1.11.2-scala_2.12-java11", "10.0.0.1:5000"),
///     "10.0.0.1:5000/apache/flink:1.11.2-scala_2.12-java11"
/// );
/// ```
pub fn to_private(image: &str, address: &str) -> String {
    match ImageUri::parse(image).segments() {
        ["ghcr.io", a, b, c] => format!("{}/{}/{}/{}", address, a, b, c),
        ["gcr.io" | "quay.io" | "registry.k8s.io" | "k8s.gcr.io" | "ghcr.io", a, b] => {
            format!("{}/{}/{}", address, a, b)
        }
        ["k8s.gcr.io" | "registry.k8s.io", a] => format!("{}/{}", address, a),
        [org, repo] => format!("{}/{}/{}", address, org, repo),
        [name] => format!("{}/{}", address, name),
        _ => image.to_string(),
    }
}
