//! 图片预览句柄
//!
//! `URL.createObjectURL` 创建的地址需要手动释放。`ObjectUrl` 在 drop 时调用
//! `URL.revokeObjectURL`，因此检查表单替换或移除图片时预览会被同步回收。

use web_sys::{File, Url};

#[derive(Debug, PartialEq, Eq)]
pub struct ObjectUrl {
    url: String,
}

impl ObjectUrl {
    pub fn from_file(file: &File) -> Option<Self> {
        Url::create_object_url_with_blob(file)
            .ok()
            .map(|url| Self { url })
    }

    pub fn as_str(&self) -> &str {
        &self.url
    }
}

impl Drop for ObjectUrl {
    fn drop(&mut self) {
        let _ = Url::revoke_object_url(&self.url);
    }
}
