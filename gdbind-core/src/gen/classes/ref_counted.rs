use crate :: builtin :: * ; use crate :: meta :: { Signature , ToGodot } ; use crate :: obj :: { Gd , Inherits , ObjectArg } ; use crate :: sys ; # [doc = "Engine class `RefCounted`."] # [derive (Debug)] # [repr (C)] pub struct RefCounted { object_ptr : sys :: GDExtensionObjectPtr , } impl RefCounted { # [doc = "Calls `RefCounted::init_ref`."] pub fn init_ref (& mut self ,) -> bool { unsafe { Signature :: < () , bool > :: out_class_ptrcall (crate :: gen :: central :: method_index :: RefCounted__init_ref , self . object_ptr , () ,) } } # [doc = "Calls `RefCounted::reference`."] pub fn reference (& mut self ,) -> bool { unsafe { Signature :: < () , bool > :: out_class_ptrcall (crate :: gen :: central :: method_index :: RefCounted__reference , self . object_ptr , () ,) } } # [doc = "Calls `RefCounted::unreference`."] pub fn unreference (& mut self ,) -> bool { unsafe { Signature :: < () , bool > :: out_class_ptrcall (crate :: gen :: central :: method_index :: RefCounted__unreference , self . object_ptr , () ,) } } # [doc = "Calls `RefCounted::get_reference_count`."] pub fn get_reference_count (& self ,) -> i32 { unsafe { Signature :: < () , i32 > :: out_class_ptrcall (crate :: gen :: central :: method_index :: RefCounted__get_reference_count , self . object_ptr , () ,) } } # [doc = "View of this object as its base class `Object`."] pub fn as_object (& self) -> & crate :: classes :: Object { unsafe { & * (self as * const Self as * const crate :: classes :: Object) } } # [doc = "View of this object as its base class `Object`."] pub fn as_object_mut (& mut self) -> & mut crate :: classes :: Object { unsafe { & mut * (self as * mut Self as * mut crate :: classes :: Object) } } } impl crate :: obj :: GodotClass for RefCounted { type Base = crate :: classes :: Object ; const CLASS_NAME : & 'static str = "RefCounted" ; fn class_name_c () -> & 'static std :: ffi :: CStr { c"RefCounted" } } unsafe impl crate :: obj :: Bounds for RefCounted { type Memory = crate :: obj :: bounds :: MemRefCounted ; type DynMemory = crate :: obj :: bounds :: MemRefCounted ; type Declarer = crate :: obj :: bounds :: DeclEngine ; } unsafe impl crate :: obj :: Inherits < crate :: classes :: Object > for RefCounted { } impl std :: ops :: Deref for RefCounted { type Target = crate :: classes :: Object ; fn deref (& self) -> & Self :: Target { unsafe { & * (self as * const Self as * const Self :: Target) } } } impl std :: ops :: DerefMut for RefCounted { fn deref_mut (& mut self) -> & mut Self :: Target { unsafe { & mut * (self as * mut Self as * mut Self :: Target) } } } impl crate :: obj :: cap :: GodotDefault for RefCounted { } # [doc (hidden)] # [macro_export] macro_rules ! inherit_from_RefCounted__gdbind { ($ Class : ty) => { unsafe impl :: gdbind :: obj :: Inherits < :: gdbind :: classes :: RefCounted > for $ Class { } unsafe impl :: gdbind :: obj :: Inherits < :: gdbind :: classes :: Object > for $ Class { } } ; }