use crate::request::Request;

/// Trait for links in a dispatch chain. Implementations must be `Send + Sync`
/// so a built chain can be shared across threads while requests are dispatched.
///
/// A handler only ever sees the request it is asked about. It does not know its
/// position in the chain, nor whether anything follows it: forwarding on refusal
/// is done by [`crate::chain::Chain::handle`], never by the handler itself.
///
/// # Examples
///
/// ```rust
/// use chain_core::chain::Chain;
/// use chain_core::handler::Handler;
/// use chain_core::request::Request;
///
/// struct Echo;
///
/// impl Handler for Echo {
///     fn name(&self) -> &str {
///         "Echo"
///     }
///
///     fn processing(&self, request: &mut Request) -> bool {
///         request.response = Some(request.key.clone());
///         true
///     }
/// }
///
/// let chain = Chain::new(Box::new(Echo));
/// let mut request = Request::get("ping");
/// assert!(chain.handle(&mut request));
/// assert_eq!(request.response.as_deref(), Some("ping"));
/// ```
pub trait Handler: Send + Sync {
    /// Identity recorded onto a request's trace when the chain visits this handler.
    fn name(&self) -> &str;

    /// Attempt to resolve `request` locally.
    ///
    /// Returns `true` after setting `request.response` when the request is
    /// satisfied, `false` otherwise. Must not forward and must not touch
    /// `request.trace`.
    fn processing(&self, request: &mut Request) -> bool;
}

impl<H: Handler + ?Sized> Handler for Box<H> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn processing(&self, request: &mut Request) -> bool {
        (**self).processing(request)
    }
}
