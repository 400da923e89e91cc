pub trait ObjectReader {
    /// Lists every key under `prefix`, across all result pages.
    fn list_keys(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, String>;
    fn read_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, String>;
}

impl<T: ObjectReader + ?Sized> ObjectReader for &T {
    fn list_keys(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, String> {
        (**self).list_keys(bucket, prefix)
    }

    fn read_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, String> {
        (**self).read_object(bucket, key)
    }
}
