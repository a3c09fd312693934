/// Generates an async client method that sends `$request::$variant` to the actor
/// and waits for its reply. Channel failures become `$error::Unavailable`.
#[macro_export]
macro_rules! client_method {
    ($client:ty => fn $method:ident($($param:ident: $param_type:ty),*) -> $return_type:ty as $request:ident::$variant:ident, Error = $error_type:ident) => {
        impl $client {
            #[tracing::instrument(skip(self))]
            pub async fn $method(&self, $($param: $param_type),*) -> Result<$return_type, $error_type> {
                tracing::debug!("Sending request");
                let (respond_to, response) = tokio::sync::oneshot::channel();
                self.sender
                    .send($request::$variant {
                        $($param,)*
                        respond_to,
                    })
                    .await
                    .map_err(|_| $error_type::Unavailable("Actor closed".to_string()))?;

                response
                    .await
                    .map_err(|_| $error_type::Unavailable("Actor dropped".to_string()))
            }
        }
    };
}
