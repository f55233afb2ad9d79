/// User-agent tokens that mark a mobile device, matched case-insensitively
pub const MOBILE_TOKENS: [&str; 8] =
    ["Android", "webOS", "iPhone", "iPad", "iPod", "BlackBerry", "IEMobile", "Opera Mini"];
