use crate::runtime::contract::InvocationRequest;

pub trait EndpointInvoker {
    /// Returns the raw response body.
    fn invoke(&self, request: &InvocationRequest) -> Result<Vec<u8>, String>;
}

impl<T: EndpointInvoker + ?Sized> EndpointInvoker for &T {
    fn invoke(&self, request: &InvocationRequest) -> Result<Vec<u8>, String> {
        (**self).invoke(request)
    }
}
